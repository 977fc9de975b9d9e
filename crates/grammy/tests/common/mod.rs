use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const SONG_BOOK: &str = r#"
project "song-book"

handler "HealthHandler" {
    function-name "health-handler"
    code-path "backend/health"
}

handler "SongsHandler" {
    function-name "songs-handler"
    code-path "backend/songs"
    memory 256
}

route "health" handler="HealthHandler" auth=#false

routes {
    route "songs" handler="SongsHandler"
    route "songs" method="POST" handler="SongsHandler"
    route "songs/{id}" handler="SongsHandler" api-key=#true
}

user-pool
table
"#;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_grammy_kdl(&self, content: &str) {
        self.write_file("grammy.kdl", content);
    }

    #[allow(dead_code)]
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}
