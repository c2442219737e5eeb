mod incremental;
mod parse_bad;
mod properties;
