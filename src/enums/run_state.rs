/// Whether an operator holds a plan that may be executed.
///
/// Every setup call first drops back to `Invalid`, and only a fully
/// successful setup moves it to `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Invalid,
    Ready,
}
