/// Fan-out splitter behaviour.
pub mod splitter;
