/// Strong emphasis delimiters, tried before single emphasis.
pub struct Strong;

impl Strong {
    pub const STARS: &'static [char] = &['*', '*'];
    pub const UNDERSCORES: &'static [char] = &['_', '_'];
}

pub struct Emphasis;

impl Emphasis {
    pub const STAR: &'static [char] = &['*'];
    pub const UNDERSCORE: &'static [char] = &['_'];
}

pub struct Strikethrough;

impl Strikethrough {
    pub const TILDES: &'static [char] = &['~', '~'];
}
