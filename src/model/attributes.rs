use serde::{Deserialize, Serialize};

pub const ATTRIBUTE_MIN: i32 = 0;
pub const ATTRIBUTE_MAX: i32 = 100;

/// A named attribute. `Destiny` is hidden and not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Attribute {
    Strength,
    Intelligence,
    Leadership,
    Politics,
    Charisma,
    Destiny,
}

string_enum!(Attribute, "attribute", {
    Strength => "strength",
    Intelligence => "intelligence",
    Leadership => "leadership",
    Politics => "politics",
    Charisma => "charisma",
    Destiny => "destiny",
});

impl Attribute {
    /// The five visible attributes, in display order.
    pub const VISIBLE: [Attribute; 5] = [
        Attribute::Strength,
        Attribute::Intelligence,
        Attribute::Leadership,
        Attribute::Politics,
        Attribute::Charisma,
    ];

    pub fn is_visible(self) -> bool {
        self != Attribute::Destiny
    }
}

/// Target of an attribute-modifying effect: one attribute, or every visible one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AttributeTarget {
    One(Attribute),
    AllVisible,
}

impl From<AttributeTarget> for String {
    fn from(t: AttributeTarget) -> Self {
        match t {
            AttributeTarget::One(attr) => attr.into(),
            AttributeTarget::AllVisible => "all_attributes".to_string(),
        }
    }
}

impl TryFrom<String> for AttributeTarget {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "all_attributes" {
            return Ok(AttributeTarget::AllVisible);
        }
        Attribute::try_from(s).map(AttributeTarget::One)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i32,
    pub intelligence: i32,
    pub leadership: i32,
    pub politics: i32,
    pub charisma: i32,
    #[serde(default)]
    pub destiny: i32,
}

impl Attributes {
    /// Every visible attribute set to `value`, destiny set to `destiny`.
    pub fn uniform(value: i32, destiny: i32) -> Self {
        Self {
            strength: value,
            intelligence: value,
            leadership: value,
            politics: value,
            charisma: value,
            destiny,
        }
    }

    pub fn get(&self, attr: Attribute) -> i32 {
        match attr {
            Attribute::Strength => self.strength,
            Attribute::Intelligence => self.intelligence,
            Attribute::Leadership => self.leadership,
            Attribute::Politics => self.politics,
            Attribute::Charisma => self.charisma,
            Attribute::Destiny => self.destiny,
        }
    }

    fn slot_mut(&mut self, attr: Attribute) -> &mut i32 {
        match attr {
            Attribute::Strength => &mut self.strength,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Leadership => &mut self.leadership,
            Attribute::Politics => &mut self.politics,
            Attribute::Charisma => &mut self.charisma,
            Attribute::Destiny => &mut self.destiny,
        }
    }

    /// Add `delta` to an attribute and return the applied change.
    ///
    /// Visible attributes stay within `[0, 100]`; destiny is unbounded.
    pub fn adjust(&mut self, attr: Attribute, delta: i32) -> i32 {
        let slot = self.slot_mut(attr);
        let old = *slot;
        let new = if attr.is_visible() {
            old.saturating_add(delta).clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX)
        } else {
            old.saturating_add(delta)
        };
        *slot = new;
        new - old
    }

    /// Apply `delta` to a target, returning the total applied change.
    pub fn adjust_target(&mut self, target: AttributeTarget, delta: i32) -> i32 {
        match target {
            AttributeTarget::One(attr) => self.adjust(attr, delta),
            AttributeTarget::AllVisible => Attribute::VISIBLE
                .iter()
                .map(|&attr| self.adjust(attr, delta))
                .sum(),
        }
    }

    pub fn visible_total(&self) -> i32 {
        Attribute::VISIBLE.iter().map(|&a| self.get(a)).sum()
    }

    pub fn visible_in_bounds(&self) -> bool {
        Attribute::VISIBLE
            .iter()
            .all(|&a| (ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(&self.get(a)))
    }
}
