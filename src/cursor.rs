/// Mouse cursor shapes a component or tool can request from its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Hand,
    Move,
    Text,
    Wait,
    NorthWestResize,
    NorthResize,
    NorthEastResize,
    EastResize,
    SouthEastResize,
    SouthResize,
    SouthWestResize,
    WestResize,
}
