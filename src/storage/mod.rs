pub mod local;
pub mod traits;

use std::path::PathBuf;

pub use local::LocalImageStore;
pub use traits::ImageStore;

/// Reduces a user's display name to a single safe path component.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// Relative location of a generated image: `<display name>/<filename>`.
pub fn image_path(display_name: &str, filename: &str) -> PathBuf {
    PathBuf::from(sanitize_component(display_name)).join(filename)
}

/// `generated_<8 hex>.png`, unique per call.
pub fn generated_filename() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("generated_{}.png", &id[..8])
}
