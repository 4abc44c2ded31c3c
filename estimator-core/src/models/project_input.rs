use serde::{Deserialize, Serialize};

/// Smallest project the wizard accepts, in square feet.
pub const SIZE_MIN: u32 = 100;

/// Largest project the wizard accepts, in square feet.
pub const SIZE_MAX: u32 = 50_000;

/// Everything the visitor enters across the wizard steps.
///
/// Values are kept as entered (strings for the select fields and the size)
/// so a half-filled form can be saved and restored unchanged. The field
/// names serialize in camelCase to match the stored draft format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInput {
    pub project_type: String,
    pub location: String,

    /// Square footage as typed, e.g. `"1,200"`.
    pub size: String,

    // Advisory only; never priced.
    pub timeline: String,
    pub budget: String,
    pub complexity: String,

    /// Material grade. Single select; only the first element is priced.
    pub materials: Vec<String>,
    pub features: Vec<String>,
    pub is_veteran: bool,
}

impl ProjectInput {
    /// Parses [`ProjectInput::size`] into a positive whole number of square feet.
    ///
    /// Surrounding whitespace and thousands separators are ignored. Returns
    /// `None` for empty, non-numeric or zero input. The accepted range is
    /// not checked here; see [`SIZE_MIN`] and [`SIZE_MAX`].
    pub fn square_footage(&self) -> Option<u32> {
        let normalized = self.size.trim().replace(',', "");
        match normalized.parse::<u32>() {
            Ok(0) | Err(_) => None,
            Ok(v) => Some(v),
        }
    }

    /// The material grade that is priced, if one was chosen.
    pub fn primary_material(&self) -> Option<&str> {
        self.materials
            .first()
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Replaces the material selection with a single grade.
    pub fn set_material(
        &mut self,
        material: impl Into<String>,
    ) {
        self.materials = vec![material.into()];
    }

    /// Adds `feature` when absent, removes it when present.
    pub fn toggle_feature(
        &mut self,
        feature: &str,
    ) {
        if let Some(pos) = self.features.iter().position(|f| f == feature) {
            self.features.remove(pos);
        } else {
            self.features.push(feature.to_string());
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// True when nothing has been entered yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
