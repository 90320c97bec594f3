use std::fmt;

/// Card types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum CardType {
    Familiar,
    Spell,
    Azoth,
    Burst,
    Flag,
}

impl CardType {
    /// Returns true if cards of this type stay in play after being played.
    pub fn is_permanent(&self) -> bool {
        matches!(self, CardType::Familiar | CardType::Azoth | CardType::Flag)
    }

    /// Returns true if this type is played through the stack.
    pub fn uses_stack(&self) -> bool {
        matches!(self, CardType::Spell | CardType::Burst)
    }

    /// Burst cards may be played at any time by either player.
    pub fn is_instant_speed(&self) -> bool {
        matches!(self, CardType::Burst)
    }
}

/// Card elements, the colour identity of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
    Void,
}

/// A quality a card can have protection from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ProtectionFrom {
    CardType(CardType),
    Element(Element),
}

impl ProtectionFrom {
    /// Returns true if a source with the given type and elements has this quality.
    pub fn matches(&self, card_type: CardType, elements: &[Element]) -> bool {
        match self {
            ProtectionFrom::CardType(t) => *t == card_type,
            ProtectionFrom::Element(e) => elements.contains(e),
        }
    }
}

impl fmt::Display for ProtectionFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtectionFrom::CardType(t) => write!(f, "protection from {t}"),
            ProtectionFrom::Element(e) => write!(f, "protection from {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_card_type_speed() {
        assert!(CardType::Familiar.is_permanent());
        assert!(CardType::Azoth.is_permanent());
        assert!(!CardType::Spell.is_permanent());
        assert!(CardType::Burst.uses_stack());
        assert!(CardType::Burst.is_instant_speed());
        assert!(!CardType::Spell.is_instant_speed());
    }

    #[test]
    fn test_card_type_parse() {
        assert_eq!(CardType::from_str("familiar"), Ok(CardType::Familiar));
        assert_eq!(CardType::from_str("Burst"), Ok(CardType::Burst));
        assert!(CardType::from_str("creature").is_err());
    }

    #[test]
    fn test_protection_matches() {
        let from_dark = ProtectionFrom::Element(Element::Dark);
        assert!(from_dark.matches(CardType::Spell, &[Element::Fire, Element::Dark]));
        assert!(!from_dark.matches(CardType::Spell, &[Element::Fire]));

        let from_spells = ProtectionFrom::CardType(CardType::Spell);
        assert!(from_spells.matches(CardType::Spell, &[]));
        assert!(!from_spells.matches(CardType::Burst, &[]));
    }
}
