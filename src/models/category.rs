use serde::{Deserialize, Serialize};

/// Fixed classification bucket for a source descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Anime,
    Manga,
    Novel,
    MoviesShows,
    Other,
}

impl Category {
    /// Every category, in output order
    pub const ALL: [Category; 5] = [
        Category::Anime,
        Category::Manga,
        Category::Novel,
        Category::MoviesShows,
        Category::Other,
    ];

    /// Label used for file names and summary keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Anime => "anime",
            Category::Manga => "manga",
            Category::Novel => "novel",
            Category::MoviesShows => "movies_shows",
            Category::Other => "other",
        }
    }

    /// Output file name, e.g. `movies_shows.json`
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Position within [`Category::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anime" => Ok(Category::Anime),
            "manga" => Ok(Category::Manga),
            "novel" => Ok(Category::Novel),
            "movies_shows" => Ok(Category::MoviesShows),
            "other" => Ok(Category::Other),
            _ => anyhow::bail!(
                "Invalid category: {s}. Use: anime, manga, novel, movies_shows, other"
            ),
        }
    }
}
