use crate::core::catalog::Catalog;
use crate::core::membership::Membership;
use crate::domain::model::{BookId, Entity, MemberId, Snapshot};
use crate::utils::error::{LibraryError, Result};
use std::collections::HashMap;

/// Catalog and membership together. Issue and return go through here so both
/// sides change together or not at all.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub catalog: Catalog,
    pub membership: Membership,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut library = Self::new();
        for book in snapshot.books {
            library.catalog.restore(book)?;
        }
        for member in snapshot.members {
            library.membership.restore(member)?;
        }
        Ok(library)
    }

    pub fn issue_book(&mut self, book_id: BookId, member_id: MemberId) -> Result<()> {
        let book = self
            .catalog
            .find_book(book_id)
            .ok_or_else(|| LibraryError::not_found(Entity::Book, book_id.0))?;
        if self.membership.find_member(member_id).is_none() {
            return Err(LibraryError::not_found(Entity::Member, member_id.0));
        }
        if book.issued {
            return Err(LibraryError::invalid_state("Book already issued"));
        }

        self.catalog.mark_issued(book_id)?;
        self.membership.record_issue(member_id, book_id)?;
        tracing::info!("Issued book {} to member {}", book_id, member_id);
        Ok(())
    }

    pub fn return_book(&mut self, book_id: BookId, member_id: MemberId) -> Result<()> {
        let book = self
            .catalog
            .find_book(book_id)
            .ok_or_else(|| LibraryError::not_found(Entity::Book, book_id.0))?;
        if self.membership.find_member(member_id).is_none() {
            return Err(LibraryError::not_found(Entity::Member, member_id.0));
        }
        if !book.issued {
            return Err(LibraryError::invalid_state("Book is not issued"));
        }
        // a flagged book nobody holds can be returned by anyone
        let other_holder = self
            .membership
            .holder_of(book_id)
            .filter(|holder| *holder != member_id);
        if let Some(holder) = other_holder {
            return Err(LibraryError::invalid_state(format!(
                "Book {} is issued to member {}",
                book_id, holder
            )));
        }

        self.catalog.mark_returned(book_id)?;
        self.membership.record_return(member_id, book_id)?;
        tracing::info!("Member {} returned book {}", member_id, book_id);
        Ok(())
    }

    /// Describes every place where the issued flags and the members' lists disagree.
    pub fn consistency_report(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut holders: HashMap<BookId, Vec<MemberId>> = HashMap::new();

        for member in self.membership.iter() {
            for book_id in &member.issued_books {
                holders.entry(*book_id).or_default().push(member.id);
                if self.catalog.find_book(*book_id).is_none() {
                    problems.push(format!(
                        "member {} holds unknown book {}",
                        member.id, book_id
                    ));
                }
            }
        }

        for book in self.catalog.iter() {
            match (book.issued, holders.get(&book.id).map(Vec::len).unwrap_or(0)) {
                (true, 0) => problems.push(format!("book {} is issued but nobody holds it", book.id)),
                (false, n) if n > 0 => problems.push(format!(
                    "book {} is not issued but is held by {} member(s)",
                    book.id, n
                )),
                (true, n) if n > 1 => problems.push(format!(
                    "book {} is held {} times",
                    book.id, n
                )),
                _ => {}
            }
        }

        problems
    }
}
