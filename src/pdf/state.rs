//! Navigation state management

/// Which page is shown, if any document is loaded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavigationState {
    /// No document
    #[default]
    Empty,
    /// A document is loaded; `1 <= current_page <= page_count`
    Loaded {
        current_page: usize,
        page_count: usize,
    },
}

impl NavigationState {
    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::Reset(page_count) => {
                if page_count == 0 {
                    *self = Self::Empty;
                    return vec![Effect::ClearSurface];
                }
                *self = Self::Loaded {
                    current_page: 1,
                    page_count,
                };
                vec![Effect::RenderPage(1)]
            }

            Command::Advance(delta) => {
                let Self::Loaded {
                    current_page,
                    page_count,
                } = self
                else {
                    return vec![];
                };

                match current_page.checked_add_signed(delta as isize) {
                    Some(candidate) if (1..=*page_count).contains(&candidate) => {
                        *current_page = candidate;
                        vec![Effect::RenderPage(candidate)]
                    }
                    _ => vec![],
                }
            }

            Command::Close => {
                if *self == Self::Empty {
                    vec![]
                } else {
                    *self = Self::Empty;
                    vec![Effect::ClearSurface]
                }
            }

            Command::Resize => match self {
                Self::Loaded { current_page, .. } => vec![Effect::RenderPage(*current_page)],
                Self::Empty => vec![],
            },
        }
    }

    #[must_use]
    pub fn current_page(&self) -> Option<usize> {
        match self {
            Self::Loaded { current_page, .. } => Some(*current_page),
            Self::Empty => None,
        }
    }

    #[must_use]
    pub fn page_count(&self) -> Option<usize> {
        match self {
            Self::Loaded { page_count, .. } => Some(*page_count),
            Self::Empty => None,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Whether the "next" control is enabled
    #[must_use]
    pub fn can_advance(&self) -> bool {
        matches!(self, Self::Loaded { current_page, page_count } if current_page < page_count)
    }

    /// Whether the "previous" control is enabled
    #[must_use]
    pub fn can_retreat(&self) -> bool {
        matches!(self, Self::Loaded { current_page, .. } if *current_page > 1)
    }
}

/// Commands that modify navigation state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// A document with this many pages was loaded
    Reset(usize),
    /// Move by a signed number of pages
    Advance(i64),
    /// Drop the document
    Close,
    /// The host viewport changed size
    Resize,
}

/// Effects produced by state changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Render this page (1-indexed)
    RenderPage(usize),
    /// Blank the drawing surface
    ClearSurface,
}
