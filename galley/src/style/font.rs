// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Visual style of a font.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub enum FontStyle {
    /// An upright face.
    #[default]
    Normal,
    /// A cursive italic face.
    Italic,
    /// A slanted upright face.
    Oblique,
}

/// Weight of a font, on the usual 1..=1000 scale.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const LIGHT: Self = Self(300);
    pub const NORMAL: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const SEMI_BOLD: Self = Self(600);
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Width class of a font, as a percentage of normal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FontStretch(pub u16);

impl FontStretch {
    pub const CONDENSED: Self = Self(75);
    pub const NORMAL: Self = Self(100);
    pub const EXPANDED: Self = Self(125);
}

impl Default for FontStretch {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// An OpenType feature setting.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FontFeature {
    /// Feature tag, e.g. `*b"liga"`.
    pub tag: [u8; 4],
    /// Feature value; for boolean features 0 disables and 1 enables.
    pub value: u16,
}

/// Selection properties for a font, excluding size.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FontSpec<'a> {
    /// Family name.
    pub family: &'a str,
    /// Visual style.
    pub style: FontStyle,
    /// Weight.
    pub weight: FontWeight,
    /// Width class.
    pub stretch: FontStretch,
}

impl<'a> FontSpec<'a> {
    /// A regular face of the given family.
    pub fn new(family: &'a str) -> Self {
        Self {
            family,
            style: FontStyle::default(),
            weight: FontWeight::default(),
            stretch: FontStretch::default(),
        }
    }
}
