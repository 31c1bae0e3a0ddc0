use crate::classifier::AVAILABLE_DRUGS;

/// Number of quick-pick buttons offered beside the free-text input.
pub const QUICK_PICK_COUNT: usize = 10;

/// Drug list being assembled on the analysis screen.
///
/// Names are stored upper-cased and unique, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrugSelection {
    selected: Vec<String>,
    input: String,
}

impl DrugSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Text still sitting in the free-text input.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, drug: &str) -> bool {
        self.selected.iter().any(|d| d == drug)
    }

    /// Quick-pick button: add when absent, remove when present.
    pub fn toggle(&mut self, drug: &str) {
        if self.contains(drug) {
            self.remove(drug);
        } else {
            self.selected.push(drug.to_string());
        }
    }

    pub fn remove(&mut self, drug: &str) {
        self.selected.retain(|d| d != drug);
    }

    /// Free-text input changed. A comma commits the text before it and
    /// keeps the remainder in the input.
    pub fn input_changed(&mut self, value: &str) {
        match value.split_once(',') {
            Some((head, rest)) => {
                self.commit(head);
                self.input = rest.trim().to_string();
            }
            None => self.input = value.to_string(),
        }
    }

    /// Enter pressed: commit the trimmed input and clear it.
    pub fn submit_input(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.input);
        self.commit(&pending);
    }

    fn commit(&mut self, raw: &str) {
        let drug = raw.trim().to_uppercase();
        if !drug.is_empty() && !self.contains(&drug) {
            self.selected.push(drug);
        }
    }

    /// Drugs offered as one-click buttons.
    pub fn quick_picks() -> &'static [&'static str] {
        &AVAILABLE_DRUGS[..QUICK_PICK_COUNT.min(AVAILABLE_DRUGS.len())]
    }
}
