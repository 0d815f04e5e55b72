#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    ToggleSort,
    CycleRefreshInterval,
    SlowerRefresh,
    FasterRefresh,
    Kill(u32),
    ForceKill(u32),
    ToggleHelp,
    None,
}
