pub mod time;

/// Id of one invocation, unique per engine.
pub fn longid() -> String {
    nanoid::nanoid!(21)
}
