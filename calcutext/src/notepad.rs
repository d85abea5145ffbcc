use interpreter::Environment;
use log::{debug, warn};
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    colors::{cycle, Color, VariableColorAssigner},
    document::{Text, TextId},
    lines::{Evaluator, Line, LineEvaluator},
    settings::Settings,
    storage::{Storage, StorageError, ACTIVE_TEXT_ID_KEY, SETTINGS_KEY, TEXTS_KEY},
};

#[derive(Debug, thiserror::Error)]
pub enum NotepadError {
    #[error("cannot delete the last text")]
    LastText,
    #[error("no text with id {0}")]
    UnknownText(TextId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An editing session over the stored documents.
///
/// Every mutation re-evaluates the active document, fills in colors for
/// newly bound variables and writes the whole state back to storage.
pub struct Notepad<S, R, E = Environment> {
    storage: S,
    texts: Vec<Text>,
    active_text_id: TextId,
    settings: Settings,
    active_variable: Option<String>,
    lines: Vec<Line>,
    evaluator: LineEvaluator<E>,
    colors: VariableColorAssigner<R>,
}

fn read<S: Storage, T: DeserializeOwned>(storage: &S, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(raw) => raw?,
        Err(err) => {
            warn!("could not read `{}`: {}", key, err);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("ignoring malformed `{}`: {}", key, err);
            None
        }
    }
}

fn read_active_id<S: Storage>(storage: &S) -> Option<TextId> {
    let raw = match storage.get(ACTIVE_TEXT_ID_KEY) {
        Ok(raw) => raw?,
        Err(err) => {
            warn!("could not read `{}`: {}", ACTIVE_TEXT_ID_KEY, err);
            return None;
        }
    };
    match raw.trim().trim_matches('"').parse() {
        Ok(id) => Some(id),
        Err(err) => {
            warn!("ignoring malformed `{}`: {}", ACTIVE_TEXT_ID_KEY, err);
            None
        }
    }
}

impl<S: Storage, R: Rng, E: Evaluator + Default> Notepad<S, R, E> {
    pub fn load(storage: S, rng: R) -> Result<Self, NotepadError> {
        Self::load_with(storage, rng, E::default())
    }
}

impl<S: Storage, R: Rng, E: Evaluator> Notepad<S, R, E> {
    /// Restores the stored state, falling back to defaults for anything
    /// missing or unreadable, then renders and persists it.
    pub fn load_with(storage: S, rng: R, evaluator: E) -> Result<Self, NotepadError> {
        let texts = match read::<S, Vec<Text>>(&storage, TEXTS_KEY) {
            Some(texts) if !texts.is_empty() => texts,
            _ => vec![Text::new()],
        };
        let active_text_id = match read_active_id(&storage) {
            Some(id) if texts.iter().any(|text| text.id == id) => id,
            Some(id) => {
                warn!("stored active text {} does not exist", id);
                texts[0].id
            }
            None => texts[0].id,
        };
        let settings = read(&storage, SETTINGS_KEY).unwrap_or_default();

        let mut notepad = Notepad {
            storage,
            texts,
            active_text_id,
            settings,
            active_variable: None,
            lines: Vec::new(),
            evaluator: LineEvaluator::new(evaluator),
            colors: VariableColorAssigner::new(rng),
        };
        notepad.update()?;
        Ok(notepad)
    }

    pub fn texts(&self) -> &[Text] {
        &self.texts
    }

    pub fn active_text_id(&self) -> TextId {
        self.active_text_id
    }

    pub fn active_text(&self) -> &Text {
        &self.texts[self.active_index()]
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn active_variable(&self) -> Option<&str> {
        self.active_variable.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn color_of(&self, name: &str) -> Option<Color> {
        self.active_text().data.colors.color(name)
    }

    pub fn stylesheet(&self) -> String {
        self.active_text().data.colors.stylesheet()
    }

    // The active id always names a text; loading and deletion keep it so.
    fn active_index(&self) -> usize {
        self.texts
            .iter()
            .position(|text| text.id == self.active_text_id)
            .unwrap_or(0)
    }

    pub fn add_text(&mut self) -> Result<TextId, NotepadError> {
        let text = Text::new();
        let id = text.id;
        self.texts.push(text);
        self.activate(id);
        self.update()?;
        Ok(id)
    }

    pub fn delete_active_text(&mut self) -> Result<(), NotepadError> {
        if self.texts.len() == 1 {
            return Err(NotepadError::LastText);
        }
        let index = self.active_index();
        self.texts.remove(index);
        // the text after the deleted one, else the one before
        let next = self.texts[index.min(self.texts.len() - 1)].id;
        self.activate(next);
        self.update()
    }

    pub fn select_text(&mut self, id: TextId) -> Result<(), NotepadError> {
        if !self.texts.iter().any(|text| text.id == id) {
            return Err(NotepadError::UnknownText(id));
        }
        self.activate(id);
        self.update()
    }

    fn activate(&mut self, id: TextId) {
        if self.active_text_id != id {
            self.active_variable = None;
        }
        self.active_text_id = id;
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), NotepadError> {
        let index = self.active_index();
        self.texts[index].data.title = title.into();
        self.update()
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> Result<(), NotepadError> {
        let index = self.active_index();
        self.texts[index].data.body = body.into();
        self.update()
    }

    pub fn set_width(&mut self, width: Option<u32>) -> Result<(), NotepadError> {
        self.settings.width = width;
        self.update()
    }

    /// Clicking a variable makes it active; clicking the active one again,
    /// or anything that is not a variable, clears it.
    pub fn click(&mut self, line: usize, column: usize) -> Result<(), NotepadError> {
        let clicked = self
            .lines
            .get(line)
            .and_then(|line| line.variable_at(column))
            .map(str::to_owned);
        self.active_variable = match clicked {
            Some(name) if self.active_variable.as_ref() != Some(&name) => Some(name),
            _ => None,
        };
        self.update()
    }

    /// Moves the active variable to the next palette color.
    pub fn cycle_active_color(&mut self) -> Result<Option<Color>, NotepadError> {
        let name = match &self.active_variable {
            Some(name) => name.clone(),
            None => return Ok(None),
        };
        let index = self.active_index();
        let colors = &mut self.texts[index].data.colors;
        let next = cycle(colors.get(&name).unwrap_or(-1));
        colors.insert(name, next);
        self.update()?;
        Ok(Color::from_index(next))
    }

    fn update(&mut self) -> Result<(), NotepadError> {
        #[cfg(feature = "tracy")]
        profiling::scope!("Notepad::update");
        let index = self.active_index();
        let text = &mut self.texts[index];
        self.lines = self
            .evaluator
            .evaluate(&text.data.body, self.active_variable.as_deref());
        text.data.colors = self
            .colors
            .assign(&text.data.colors, self.evaluator.bound_names());
        debug!(
            "rendered {} line(s) of {} with {} colored variable(s)",
            self.lines.len(),
            text.id,
            text.data.colors.len()
        );
        self.persist()?;
        Ok(())
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.storage
            .set(ACTIVE_TEXT_ID_KEY, &self.active_text_id.to_string())?;
        self.write(SETTINGS_KEY, &self.settings)?;
        self.write(TEXTS_KEY, &self.texts)
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.storage.set(key, &serde_json::to_string(value)?)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use tempfile::tempdir;

    use super::*;
    use crate::{
        colors::PALETTE_SIZE,
        format::FormattedValue,
        storage::{FileStorage, MemoryStorage},
    };

    fn open<S: Storage>(storage: S) -> Notepad<S, StdRng> {
        Notepad::load(storage, StdRng::seed_from_u64(11)).unwrap()
    }

    fn results<S: Storage, R: Rng>(notepad: &Notepad<S, R>) -> Vec<Option<String>> {
        notepad
            .lines()
            .iter()
            .map(|line| line.result.as_ref().map(|r| r.to_string()))
            .collect()
    }

    #[test]
    fn starts_with_one_blank_text() {
        let storage = MemoryStorage::new();
        let notepad = open(&storage);
        assert_eq!(notepad.texts().len(), 1);
        assert!(notepad.lines().is_empty());
        assert_eq!(
            storage.get(ACTIVE_TEXT_ID_KEY).unwrap(),
            Some(notepad.active_text_id().to_string())
        );
        assert_eq!(storage.get(SETTINGS_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn body_edits_render_and_color() {
        let mut notepad = open(MemoryStorage::new());
        notepad.set_body("a = 5\nb = a * 2\nb - 1\n").unwrap();
        assert_eq!(
            results(&notepad),
            vec![
                Some("5".to_owned()),
                Some("10".to_owned()),
                Some("9".to_owned()),
                None
            ]
        );
        assert!(notepad.color_of("a").is_some());
        assert!(notepad.color_of("b").is_some());
        assert_eq!(notepad.stylesheet().lines().count(), 2);
    }

    #[test]
    fn colors_are_stable_and_kept_for_removed_variables() {
        let mut notepad = open(MemoryStorage::new());
        notepad.set_body("x = 1").unwrap();
        let color = notepad.color_of("x");
        notepad.set_body("x = 1\ny = 2").unwrap();
        assert_eq!(notepad.color_of("x"), color);
        notepad.set_body("").unwrap();
        assert_eq!(notepad.color_of("x"), color);
    }

    #[test]
    fn cannot_delete_last_text() {
        let mut notepad = open(MemoryStorage::new());
        assert!(matches!(notepad.delete_active_text(), Err(NotepadError::LastText)));
        assert_eq!(notepad.texts().len(), 1);
    }

    #[test]
    fn deletion_selects_next_then_previous() {
        let mut notepad = open(MemoryStorage::new());
        let first = notepad.active_text_id();
        let second = notepad.add_text().unwrap();
        let third = notepad.add_text().unwrap();
        assert_eq!(notepad.active_text_id(), third);

        notepad.select_text(second).unwrap();
        notepad.delete_active_text().unwrap();
        assert_eq!(notepad.active_text_id(), third);

        notepad.delete_active_text().unwrap();
        assert_eq!(notepad.active_text_id(), first);
        assert_eq!(notepad.texts().len(), 1);
    }

    #[test]
    fn selecting_unknown_text_fails() {
        let mut notepad = open(MemoryStorage::new());
        let stranger = TextId::new();
        assert!(matches!(
            notepad.select_text(stranger),
            Err(NotepadError::UnknownText(id)) if id == stranger
        ));
    }

    #[test]
    fn click_toggles_active_variable() {
        let mut notepad = open(MemoryStorage::new());
        notepad.set_body("total = 3\ntotal * 2").unwrap();

        notepad.click(1, 2).unwrap();
        assert_eq!(notepad.active_variable(), Some("total"));
        assert_eq!(
            notepad.lines()[0].html(),
            r#"<span class="variable variable-total variable-active" data-variable="total">total</span> = 3"#
        );

        notepad.click(0, 0).unwrap();
        assert_eq!(notepad.active_variable(), None);

        notepad.click(0, 0).unwrap();
        notepad.click(1, 7).unwrap();
        assert_eq!(notepad.active_variable(), None);
    }

    #[test]
    fn cycling_moves_to_next_color() {
        let mut notepad = open(MemoryStorage::new());
        notepad.set_body("k = 1").unwrap();
        assert_eq!(notepad.cycle_active_color().unwrap(), None);

        notepad.click(0, 0).unwrap();
        let before = notepad.active_text().data.colors.get("k").unwrap();
        let after = notepad.cycle_active_color().unwrap().unwrap();
        assert_eq!(after as i64, (before + 1) % PALETTE_SIZE as i64);
        assert_eq!(notepad.color_of("k"), Some(after));
    }

    #[test]
    fn selecting_another_text_clears_active_variable() {
        let mut notepad = open(MemoryStorage::new());
        notepad.set_body("v = 1").unwrap();
        notepad.click(0, 0).unwrap();
        notepad.add_text().unwrap();
        assert_eq!(notepad.active_variable(), None);
    }

    #[test]
    fn state_round_trips_through_storage() {
        let storage = MemoryStorage::new();
        let (id, color) = {
            let mut notepad = open(&storage);
            notepad.set_body("r = 2\nr ^ 3").unwrap();
            notepad.set_title("Cubes").unwrap();
            notepad.add_text().unwrap();
            let id = notepad.texts()[0].id;
            notepad.select_text(id).unwrap();
            notepad.set_width(Some(5000)).unwrap();
            (id, notepad.color_of("r"))
        };

        let notepad = open(&storage);
        assert_eq!(notepad.texts().len(), 2);
        assert_eq!(notepad.active_text_id(), id);
        assert_eq!(notepad.active_text().display_title(), "Cubes");
        assert_eq!(notepad.color_of("r"), color);
        assert_eq!(notepad.settings().effective_width(), 900);
        assert_eq!(notepad.lines()[1].result, Some(FormattedValue::Integer(8)));
    }

    #[test]
    fn malformed_storage_falls_back_to_defaults() {
        let storage = MemoryStorage::new();
        storage.set(TEXTS_KEY, "{not json").unwrap();
        storage.set(ACTIVE_TEXT_ID_KEY, "nope").unwrap();
        storage.set(SETTINGS_KEY, "[]").unwrap();
        let notepad = open(&storage);
        assert_eq!(notepad.texts().len(), 1);
        assert_eq!(notepad.active_text_id(), notepad.texts()[0].id);
        assert_eq!(notepad.settings(), &Settings::default());
    }

    #[test]
    fn dangling_active_id_and_bad_colors_are_healed() {
        let storage = MemoryStorage::new();
        storage
            .set(
                TEXTS_KEY,
                r#"[{"id":"2f6b1f0e-8c1d-4a57-9b7e-3c8f0b3f5d11","data":{"body":"z = 1","title":"","colors":{"z":"red"}}}]"#,
            )
            .unwrap();
        storage
            .set(ACTIVE_TEXT_ID_KEY, "a1d6c0b2-5e43-4f0a-8d0e-1b2c3d4e5f60")
            .unwrap();
        let notepad = open(&storage);
        assert_eq!(
            notepad.active_text_id().to_string(),
            "2f6b1f0e-8c1d-4a57-9b7e-3c8f0b3f5d11"
        );
        assert!(notepad.color_of("z").is_some());
    }

    #[test]
    fn persists_to_files() {
        let dir = tempdir().unwrap();
        {
            let mut notepad = open(FileStorage::new(dir.path()));
            notepad.set_body("distance = 42 km").unwrap();
        }
        assert!(dir.path().join("texts.json").exists());
        let notepad = open(FileStorage::new(dir.path()));
        assert_eq!(
            notepad.lines()[0].result,
            Some(FormattedValue::Quantity("42.00 km".to_owned()))
        );
    }
}
