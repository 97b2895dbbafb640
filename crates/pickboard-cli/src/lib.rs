// Terminal front end: reads command lines, prints rendered updates.

pub mod input;
pub mod render;
