use super::State;

pub fn distance(a: &State, b: &State) -> f64 {
    (b - a).norm()
}

/// Step from `from` toward `toward`, travelling at most `max_step`.
pub fn steer(from: &State, toward: &State, max_step: f64) -> State {
    let direction = toward - from;
    let dist = direction.norm();
    if dist <= max_step {
        return *toward;
    }
    from + direction * (max_step / dist)
}
