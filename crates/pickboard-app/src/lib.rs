// Draft session orchestration: the command protocol, the text command parser,
// session snapshots, and the app event loop.

pub mod app;
pub mod command;
pub mod protocol;
pub mod snapshot;
