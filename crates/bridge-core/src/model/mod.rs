pub mod card;
pub mod card_set;
pub mod contract;
pub mod deck;
pub mod hand;
pub mod rank;
pub mod seat;
pub mod suit;
pub mod trick;
