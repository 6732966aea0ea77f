//! `exercises` command: list the catalog.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use super::common::load_catalog;
use crate::config::PlaygroundConfig;
use crate::exercise::Catalog;

pub fn list_exercises(config: &PlaygroundConfig) -> Result<()> {
    let catalog = load_catalog(config)?;
    print!("{}", format_catalog(&catalog, &config.exercises.default));
    Ok(())
}

fn format_catalog(catalog: &Catalog, default: &str) -> String {
    let width = catalog.iter().map(|e| e.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for exercise in catalog.iter() {
        let marker = if exercise.id == default { "*" } else { " " };
        let tags = format!("[{} · {}]", exercise.technology, exercise.difficulty);
        let id = format!("{:<width$}", exercise.id);
        out.push_str(&format!(
            "{marker} {}  {}  {}\n",
            id.if_supports_color(Stream::Stdout, |t| t.bold()),
            exercise.title,
            tags.if_supports_color(Stream::Stdout, |t| t.dimmed()),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_marks_default() {
        owo_colors::set_override(false);
        let text = format_catalog(&Catalog::builtin(), "html-basics");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  demo"));
        assert!(lines[1].starts_with("* html-basics"));
    }
}
