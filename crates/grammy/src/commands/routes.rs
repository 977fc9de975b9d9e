use colored::Colorize;
use grammy_core::{AuthorizationMode, LoadedProject, MethodBinding};
use std::path::PathBuf;

pub fn handle(file: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let loaded = super::load_project(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routes_json(&loaded))?);
    } else {
        print_routes(&loaded);
    }

    Ok(())
}

/// Bindings in tree order: depth-first, children by segment, methods sorted
fn ordered_bindings(loaded: &LoadedProject) -> Vec<&MethodBinding> {
    let tree = &loaded.routes;
    tree.walk()
        .into_iter()
        .flat_map(|id| tree.node(id).bindings())
        .collect()
}

fn routes_json(loaded: &LoadedProject) -> serde_json::Value {
    serde_json::json!({
        "project": loaded.project.name,
        "routes": ordered_bindings(loaded),
    })
}

fn print_routes(loaded: &LoadedProject) {
    let bindings = ordered_bindings(loaded);
    if bindings.is_empty() {
        println!("{}", "No routes declared".yellow());
        return;
    }

    let width = bindings.iter().map(|b| b.path.len()).max().unwrap_or(1);
    for binding in &bindings {
        let auth = match binding.authorization {
            AuthorizationMode::None => binding.authorization.to_string().normal(),
            _ => binding.authorization.to_string().green(),
        };
        let api_key = if binding.api_key_required {
            " [api-key]".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "{:<width$}  {:<7} → {} [auth: {}]{}",
            binding.path,
            binding.method.to_string().bold(),
            binding.handler.as_str().cyan(),
            auth,
            api_key,
            width = width
        );
    }

    println!();
    println!(
        "{} routes on {} path nodes",
        bindings.len(),
        loaded.routes.len()
    );
}
