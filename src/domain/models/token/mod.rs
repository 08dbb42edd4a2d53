pub mod token;

pub use token::{Token, TokenClaims, TokenKind, TokenPair};
