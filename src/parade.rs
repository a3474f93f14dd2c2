//! Effect registry and selection
//!
//! The parade owns the ordered effect list, resolves names and picks the
//! "current" effect under the CYCLE or RANDOM policy, optionally restricted
//! to a named subset.

use rand::rngs::SmallRng;
use rand::RngExt;
use thiserror::Error;

use crate::effects::Effect;
use crate::models::DisplayMode;

#[derive(Debug, Error)]
pub enum ParadeError {
    /// `next()` was called before any subset was selected.
    #[error("no effects selected")]
    NoneSelected,
    /// The parade was asked for its current effect before the first `next()`.
    #[error("no current effect, call next() first")]
    NotStarted,
    #[error("unknown effect: {name}")]
    UnknownEffect { name: String },
}

struct Selection {
    mode: DisplayMode,
    /// Indices into the effect list, in selection order.
    indices: Vec<usize>,
    /// Position within `indices` of the current effect.
    cursor: Option<usize>,
}

pub struct Parade {
    effects: Vec<Box<dyn Effect>>,
    selection: Option<Selection>,
    rng: SmallRng,
}

impl Parade {
    pub fn new(effects: Vec<Box<dyn Effect>>) -> Self {
        Self {
            effects,
            selection: None,
            rng: rand::make_rng::<SmallRng>(),
        }
    }

    /// Declaration-ordered (name, description) pairs for the listing output.
    pub fn list_all(&self) -> Vec<(&'static str, &'static str)> {
        self.effects
            .iter()
            .map(|effect| (effect.name(), effect.description()))
            .collect()
    }

    /// The subset of `names` matching no registered effect,
    /// case-insensitively and without duplicates. Empty means all valid.
    pub fn validate_names(&self, names: &[String]) -> Vec<String> {
        let mut unknown: Vec<String> = Vec::new();

        for name in names {
            if self.position(name).is_some() {
                continue;
            }
            if !unknown.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
                unknown.push(name.clone());
            }
        }

        unknown
    }

    /// Case-insensitive exact lookup.
    pub fn resolve(&self, name: &str) -> Result<&dyn Effect, ParadeError> {
        self.position(name)
            .map(|index| self.effects[index].as_ref())
            .ok_or_else(|| ParadeError::UnknownEffect {
                name: name.to_owned(),
            })
    }

    /// Restrict the parade to `names` (empty means all effects) under the
    /// given mode, resetting any in-progress cycle position.
    ///
    /// # Panics
    ///
    /// Non-empty `names` must already have passed [Parade::validate_names];
    /// an unvalidated name here is a programmer error.
    pub fn select(&mut self, mode: DisplayMode, names: &[String]) {
        assert!(
            self.validate_names(names).is_empty(),
            "effect names must be validated before selection"
        );

        let indices = if names.is_empty() {
            (0..self.effects.len()).collect()
        } else {
            let mut indices = Vec::with_capacity(names.len());
            for name in names {
                // position() can't miss after the validation assert
                let index = self.position(name).expect("validated effect name");
                if !indices.contains(&index) {
                    indices.push(index);
                }
            }
            indices
        };

        self.selection = Some(Selection {
            mode,
            indices,
            cursor: None,
        });
    }

    /// Advance to the next effect: in order under CYCLE, uniformly at random
    /// under RANDOM. Fails until a subset has been selected.
    pub fn next(&mut self) -> Result<&mut dyn Effect, ParadeError> {
        let Self {
            effects,
            selection,
            rng,
        } = self;
        let selection = selection.as_mut().ok_or(ParadeError::NoneSelected)?;

        let position = match selection.mode {
            DisplayMode::Cycle => selection
                .cursor
                .map(|cursor| (cursor + 1) % selection.indices.len())
                .unwrap_or(0),
            DisplayMode::Random => rng.random_range(0..selection.indices.len()),
        };
        selection.cursor = Some(position);

        Ok(effects[selection.indices[position]].as_mut())
    }

    /// The effect most recently returned by [Parade::next].
    pub fn current_mut(&mut self) -> Result<&mut dyn Effect, ParadeError> {
        let selection = self.selection.as_ref().ok_or(ParadeError::NoneSelected)?;
        let position = selection.cursor.ok_or(ParadeError::NotStarted)?;

        Ok(self.effects[selection.indices[position]].as_mut())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.effects
            .iter()
            .position(|effect| effect.name().eq_ignore_ascii_case(name))
    }
}
