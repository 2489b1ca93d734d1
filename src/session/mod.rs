pub mod countdown;
pub mod score;
