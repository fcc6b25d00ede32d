use std::path::PathBuf;

pub struct Config {
    pub pages_dir: PathBuf,
    pub db_path: PathBuf,
    pub editor: String,
}

impl Config {
    pub fn from_env() -> Self {
        let pages_dir = std::env::var("PAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("pages")
            });

        let editor = std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .unwrap_or_else(|_| "nano".to_string());

        Self::with_dir(pages_dir, editor)
    }

    pub fn with_dir(pages_dir: PathBuf, editor: impl Into<String>) -> Self {
        let db_path = pages_dir.join("pages.db");
        Self {
            pages_dir,
            db_path,
            editor: editor.into(),
        }
    }

    /// Replaces the data directory, keeping the editor.
    pub fn in_dir(self, pages_dir: PathBuf) -> Self {
        Self::with_dir(pages_dir, self.editor)
    }
}
