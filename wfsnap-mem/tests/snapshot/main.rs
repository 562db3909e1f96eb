mod common;
mod mrmw;
mod mrsw;
