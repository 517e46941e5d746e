pub struct Link;

impl Link {
    pub const OPEN: char = '[';
    /// Closes the label and opens the destination.
    pub const MIDDLE: &'static [char] = &[']', '('];
    pub const CLOSE: char = ')';
}

pub struct Image;

impl Image {
    pub const BANG: char = '!';
}
