//! Named rest positions and their resolution into concrete offsets.

use smallvec::SmallVec;

use crate::error::ConfigError;

/// A candidate rest position, relative or absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detent(DetentKind);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetentKind {
    /// Fraction of the maximum detent value, within `0..=1`.
    Fraction(f32),
    /// Fixed height, clamped to the maximum detent value.
    Height(f32),
    /// Measured content height.
    Content,
}

/// Reference extents a detent resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DetentContext {
    pub max_detent_value: f32,
    pub content_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDetent {
    pub source: Detent,
    pub offset: f32,
}

impl Detent {
    pub const CONTENT: Detent = Detent(DetentKind::Content);

    /// Unchecked constructor for in-crate constants.
    pub(crate) const fn from_kind(kind: DetentKind) -> Self {
        Self(kind)
    }

    pub fn fraction(fraction: f32) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ConfigError::InvalidFraction(fraction));
        }
        Ok(Self(DetentKind::Fraction(fraction)))
    }

    pub fn height(height: f32) -> Result<Self, ConfigError> {
        if !(height.is_finite() && height >= 0.0) {
            return Err(ConfigError::InvalidHeight(height));
        }
        Ok(Self(DetentKind::Height(height)))
    }

    pub fn kind(&self) -> DetentKind {
        self.0
    }

    pub fn resolve(&self, context: &DetentContext) -> f32 {
        match self.0 {
            DetentKind::Fraction(fraction) => context.max_detent_value * fraction,
            DetentKind::Height(height) => height.min(context.max_detent_value),
            DetentKind::Content => context.content_height,
        }
    }
}

/// Non-empty set of resolved detents, strictly ascending by offset.
#[derive(Debug, Clone, PartialEq)]
pub struct DetentSet {
    detents: SmallVec<[ResolvedDetent; 4]>,
}

impl DetentSet {
    /// Resolve, sort ascending and drop detents whose offset duplicates an
    /// earlier one (the first source wins).
    pub fn resolve(detents: &[Detent], context: &DetentContext) -> Result<Self, ConfigError> {
        if detents.is_empty() {
            return Err(ConfigError::EmptyDetents);
        }

        let mut resolved: SmallVec<[ResolvedDetent; 4]> = detents
            .iter()
            .map(|detent| ResolvedDetent {
                source: *detent,
                offset: detent.resolve(context),
            })
            .collect();
        resolved.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        resolved.dedup_by(|later, earlier| later.offset == earlier.offset);

        Ok(Self { detents: resolved })
    }

    pub fn min_detent(&self) -> &ResolvedDetent {
        &self.detents[0]
    }

    pub fn max_detent(&self) -> &ResolvedDetent {
        &self.detents[self.detents.len() - 1]
    }

    /// Detent closest to `target`; ties go to the lower offset.
    pub fn nearest(&self, target: f32) -> &ResolvedDetent {
        let mut nearest = self.min_detent();
        let mut best = (nearest.offset - target).abs();
        for detent in self.detents.iter().skip(1) {
            let distance = (detent.offset - target).abs();
            if distance < best {
                best = distance;
                nearest = detent;
            }
        }
        nearest
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedDetent> {
        self.detents.iter()
    }

    pub fn len(&self) -> usize {
        self.detents.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
