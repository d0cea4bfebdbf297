use crate::domain::model::{Book, BookId, Entity, SortKey};
use crate::utils::error::{LibraryError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// All known books, keyed by id.
///
/// Iteration, and therefore `search`, runs in ascending id order. Ids come from a
/// monotonic counter, so that is also the order books were added in.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: BTreeMap<BookId, Book>,
    categories: BTreeSet<String>,
    /// Wider than `BookId` so a restored `u32::MAX` cannot overflow it.
    next_id: u64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            books: BTreeMap::new(),
            categories: BTreeSet::new(),
            next_id: u64::from(BookId::FIRST.0),
        }
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<BookId> {
        let id = u32::try_from(self.next_id)
            .map(BookId)
            .map_err(|_| LibraryError::invalid_state("No book ids left"))?;
        self.next_id += 1;

        let book = Book::new(id, title, author, category);
        self.categories.insert(book.category.clone());
        self.books.insert(id, book);

        tracing::debug!("Added book {}", id);
        Ok(id)
    }

    /// Inserts a book read from storage, keeping its id and issued flag.
    pub fn restore(&mut self, book: Book) -> Result<()> {
        if self.books.contains_key(&book.id) {
            return Err(LibraryError::parse(format!("duplicate book id {}", book.id)));
        }
        self.next_id = self.next_id.max(u64::from(book.id.0) + 1);
        self.categories.insert(book.category.clone());
        self.books.insert(book.id, book);
        Ok(())
    }

    pub fn find_book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    pub fn mark_issued(&mut self, id: BookId) -> Result<()> {
        let book = self.book_mut(id)?;
        if book.issued {
            return Err(LibraryError::invalid_state("Book already issued"));
        }
        book.issued = true;
        Ok(())
    }

    pub fn mark_returned(&mut self, id: BookId) -> Result<()> {
        let book = self.book_mut(id)?;
        if !book.issued {
            return Err(LibraryError::invalid_state("Book is not issued"));
        }
        book.issued = false;
        Ok(())
    }

    pub fn search<'a>(&'a self, keyword: &str) -> impl Iterator<Item = &'a Book> + 'a {
        let needle = keyword.trim().to_lowercase();
        self.books.values().filter(move |book| book.matches(&needle))
    }

    pub fn sorted_view(&self, key: SortKey) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        // sort_by_cached_key is stable, ties keep id order
        match key {
            SortKey::Title => books.sort_by_cached_key(|b| b.title.to_lowercase()),
            SortKey::Author => books.sort_by_cached_key(|b| b.author.to_lowercase()),
        }
        books
    }

    /// Distinct categories across all books, alphabetically.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn book_mut(&mut self, id: BookId) -> Result<&mut Book> {
        self.books
            .get_mut(&id)
            .ok_or_else(|| LibraryError::not_found(Entity::Book, id.0))
    }
}
