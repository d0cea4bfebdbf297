use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a book. The first book of a fresh catalog gets 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u32);

/// Identifier of a member. The first member of a fresh membership gets 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl BookId {
    pub const FIRST: BookId = BookId(100);
}

impl MemberId {
    pub const FIRST: MemberId = MemberId(1000);
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(BookId)
    }
}

impl FromStr for MemberId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(MemberId)
    }
}

/// Which kind of record an id refers to, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Book,
    Member,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Book => f.write_str("Book"),
            Entity::Member => f.write_str("Member"),
        }
    }
}

/// A catalogued book. Field order is the column order of the books file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub issued: bool,
}

impl Book {
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category: category.into(),
            issued: false,
        }
    }

    /// Case-insensitive substring match against title, author and category.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.title, &self.author, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Book Details ---")?;
        writeln!(f, "Book ID : {}", self.id)?;
        writeln!(f, "Title   : {}", self.title)?;
        writeln!(f, "Author  : {}", self.author)?;
        writeln!(f, "Category: {}", self.category)?;
        write!(f, "Issued  : {}", if self.issued { "Yes" } else { "No" })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    /// Books currently held, in the order they were issued.
    pub issued_books: Vec<BookId>,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            issued_books: Vec::new(),
        }
    }

    pub fn holds(&self, book_id: BookId) -> bool {
        self.issued_books.contains(&book_id)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held: Vec<String> = self.issued_books.iter().map(|id| id.to_string()).collect();
        writeln!(f, "--- Member Details ---")?;
        writeln!(f, "Member ID   : {}", self.id)?;
        writeln!(f, "Name        : {}", self.name)?;
        writeln!(f, "Email       : {}", self.email)?;
        write!(f, "Issued Books: [{}]", held.join(", "))
    }
}

/// Field a sorted catalog view is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Author,
}

impl SortKey {
    /// Maps the sort menu's numbered choices; anything else means "unsorted".
    pub fn from_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(SortKey::Title),
            2 => Some(SortKey::Author),
            _ => None,
        }
    }
}

/// Plain books and members exchanged with a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub books: Vec<Book>,
    pub members: Vec<Member>,
}
