//! I/O utilities for manifest streams.

pub mod channel;
pub mod counting;

pub use channel::Channel;
pub use counting::CountingWriter;
