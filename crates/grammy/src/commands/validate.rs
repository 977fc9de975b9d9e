use colored::Colorize;
use grammy_core::LoadedProject;
use std::path::PathBuf;

pub fn handle(file: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{}", "Validating project...".blue());

    match super::load_project(file) {
        Ok(loaded) => {
            if let Some(entry) = loaded.files.first() {
                println!("Project file: {}", entry.display().to_string().cyan());
            }
            println!("{}", "✓ Configuration is valid".green().bold());
            println!();
            print_summary(&loaded);
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Configuration error".red().bold());
            eprintln!("  {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_summary(loaded: &LoadedProject) {
    let project = &loaded.project;

    println!("Summary:");
    println!("  Project: {} (stage {})", project.name.cyan(), project.api.stage);
    println!("  Files: {}", loaded.files.len());
    for file in &loaded.files {
        println!("    - {}", file.display());
    }

    println!("  Handlers: {}", project.handlers.len());
    for handler in project.handlers.values() {
        println!(
            "    - {} → {} ({}, {}s, {}MB)",
            handler.name.cyan(),
            handler.qualified_name(&project.name),
            handler.runtime,
            handler.timeout_secs,
            handler.memory_mb
        );
    }

    let protected = loaded.routes.bindings().filter(|b| b.is_protected()).count();
    println!(
        "  Routes: {} ({} path nodes, {} protected)",
        loaded.routes.binding_count(),
        loaded.routes.len(),
        protected
    );

    match project.authorization_context() {
        Some(auth) => println!("  Authorizer: {} ({})", auth.name.cyan(), auth.user_pool),
        None if project.protected_route_count() > 0 => println!(
            "  Authorizer: {}",
            "none (auth-required routes are open)".yellow()
        ),
        None => println!("  Authorizer: none"),
    }

    if let Some(table) = &project.table {
        println!("  Table: {}", table.name.cyan());
    }
    if let Some(frontend) = &project.frontend {
        let domain = frontend.domain.as_deref().unwrap_or("(distribution default)");
        println!("  Frontend: {} → {}", frontend.asset_path, domain);
    }
}
