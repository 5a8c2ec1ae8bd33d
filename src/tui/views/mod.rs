pub mod chat;
pub mod notebooks;
pub mod sources;
pub mod studio;
