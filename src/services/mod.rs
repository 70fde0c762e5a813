pub mod terminal;

pub use terminal::TerminalService;
