//! Exercise catalog: built-in lessons plus user JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Exercise, ExerciseError, StarterCode};
use crate::log;

/// Id of the exercise used when nothing else resolves.
pub const DEMO_ID: &str = "demo";

macro_rules! builtin_file {
    ($id:literal, $file:literal) => {
        include_str!(concat!("../embed/exercises/", $id, "/", $file))
    };
}

/// Ordered set of exercises, unique by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Catalog {
    /// The lessons shipped with the binary.
    pub fn builtin() -> Self {
        let exercises = vec![
            Exercise {
                id: DEMO_ID.to_string(),
                title: "Demo Exercise - Create a Card Component".to_string(),
                description: "Create a beautiful card component with HTML and CSS.".to_string(),
                explanation: builtin_file!("demo", "explanation.html").to_string(),
                difficulty: "Beginner".to_string(),
                technology: "HTML/CSS".to_string(),
                starter_code: StarterCode {
                    html: builtin_file!("demo", "index.html").to_string(),
                    css: builtin_file!("demo", "style.css").to_string(),
                    js: builtin_file!("demo", "script.js").to_string(),
                },
            },
            Exercise {
                id: "html-basics".to_string(),
                title: "HTML Basics: Creating Your First Webpage".to_string(),
                description:
                    "Learn the fundamentals of HTML structure and create your first webpage."
                        .to_string(),
                explanation: builtin_file!("html-basics", "explanation.html").to_string(),
                difficulty: "Beginner".to_string(),
                technology: "HTML".to_string(),
                starter_code: StarterCode {
                    html: builtin_file!("html-basics", "index.html").to_string(),
                    css: builtin_file!("html-basics", "style.css").to_string(),
                    js: builtin_file!("html-basics", "script.js").to_string(),
                },
            },
        ];
        Self { exercises }
    }

    /// Built-ins plus every `*.json` file in `dir` (sorted by file name).
    ///
    /// A file whose id matches an existing exercise replaces it.
    pub fn from_dir(dir: &Path) -> Result<Self, ExerciseError> {
        let mut catalog = Self::builtin();

        let entries =
            fs::read_dir(dir).map_err(|e| ExerciseError::Io(dir.to_path_buf(), e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for path in files {
            catalog.insert(read_exercise(&path)?);
        }
        Ok(catalog)
    }

    /// Add or replace by id.
    pub fn insert(&mut self, exercise: Exercise) {
        match self.exercises.iter_mut().find(|e| e.id == exercise.id) {
            Some(slot) => *slot = exercise,
            None => self.exercises.push(exercise),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Look `id` up, falling back to the demo lesson with a warning.
    pub fn resolve(&self, id: &str) -> Result<&Exercise, ExerciseError> {
        if let Some(exercise) = self.get(id) {
            return Ok(exercise);
        }
        log!("exercise"; "unknown exercise `{}`, loading `{}` instead", id, DEMO_ID);
        self.get(DEMO_ID)
            .ok_or_else(|| ExerciseError::NotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn read_exercise(path: &Path) -> Result<Exercise, ExerciseError> {
    let content =
        fs::read_to_string(path).map_err(|e| ExerciseError::Io(path.to_path_buf(), e))?;
    let exercise: Exercise = serde_json::from_str(&content)
        .map_err(|e| ExerciseError::Json(path.to_path_buf(), e))?;

    if exercise.id.trim().is_empty() {
        return Err(ExerciseError::Invalid(
            path.to_path_buf(),
            "`id` must not be empty".to_string(),
        ));
    }
    Ok(exercise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 2);

        let demo = catalog.get(DEMO_ID).unwrap();
        assert!(demo.starter_code.html.contains(r#"<div class="card">"#));
        assert!(demo.starter_code.css.contains(".card-button:hover"));
        assert!(demo.explanation.contains("<h3>Card Component Exercise</h3>"));

        let basics = catalog.get("html-basics").unwrap();
        assert!(basics.starter_code.html.contains("<h1>Hello World</h1>"));
        assert_eq!(basics.technology, "HTML");
    }

    #[test]
    fn test_resolve_falls_back_to_demo() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.resolve("html-basics").unwrap().id, "html-basics");
        assert_eq!(catalog.resolve("missing").unwrap().id, DEMO_ID);
    }

    #[test]
    fn test_from_dir_adds_and_overrides() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("grid.json"),
            r#"{"id":"grid","title":"Grid","starterCode":{"css":"div{display:grid}"}}"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("demo.json"),
            r#"{"id":"demo","title":"My Demo"}"#,
        )
        .unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let catalog = Catalog::from_dir(temp.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(DEMO_ID).unwrap().title, "My Demo");
        assert_eq!(
            catalog.get("grid").unwrap().starter_code.css,
            "div{display:grid}"
        );
        // Built-in order is kept, new ids are appended
        let ids: Vec<_> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["demo", "html-basics", "grid"]);
    }

    #[test]
    fn test_from_dir_reports_bad_json() {
        let temp = TempDir::new().unwrap();
        let bad = temp.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();

        match Catalog::from_dir(temp.path()) {
            Err(ExerciseError::Json(path, _)) => assert_eq!(path, bad),
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_dir_rejects_empty_id() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("x.json"), r#"{"id":" ","title":"X"}"#).unwrap();
        assert!(matches!(
            Catalog::from_dir(temp.path()),
            Err(ExerciseError::Invalid(..))
        ));
    }

    #[test]
    fn test_from_dir_missing_directory() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Catalog::from_dir(&temp.path().join("nope")),
            Err(ExerciseError::Io(..))
        ));
    }
}
