/// Which packages a run checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every package in the tree.
    #[default]
    Packages,
    /// The reverse dependencies of every package instead of the package itself.
    ReverseDependencies,
}
