// Exists only so the syn build-dependency in Cargo.toml takes effect
// (it enables syn's "full" feature for bevy_derive via unification).
fn main() {}
