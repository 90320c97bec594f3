//! Card draw triggers.

mod card_drawn;

pub use card_drawn::CardDrawnTrigger;
