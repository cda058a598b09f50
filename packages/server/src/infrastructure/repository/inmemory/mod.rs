mod book;
mod chat;

pub use book::InMemoryBookRepository;
pub use chat::InMemoryChatRepository;
