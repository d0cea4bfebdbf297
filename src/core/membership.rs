use crate::domain::model::{BookId, Entity, Member, MemberId};
use crate::utils::error::{LibraryError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Membership {
    members: BTreeMap<MemberId, Member>,
    next_id: u64,
}

impl Default for Membership {
    fn default() -> Self {
        Self {
            members: BTreeMap::new(),
            next_id: u64::from(MemberId::FIRST.0),
        }
    }
}

impl Membership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<MemberId> {
        let id = u32::try_from(self.next_id)
            .map(MemberId)
            .map_err(|_| LibraryError::invalid_state("No member ids left"))?;
        self.next_id += 1;
        self.members.insert(id, Member::new(id, name, email));

        tracing::debug!("Added member {}", id);
        Ok(id)
    }

    pub fn restore(&mut self, member: Member) -> Result<()> {
        if self.members.contains_key(&member.id) {
            return Err(LibraryError::parse(format!(
                "duplicate member id {}",
                member.id
            )));
        }
        self.next_id = self.next_id.max(u64::from(member.id.0) + 1);
        self.members.insert(member.id, member);
        Ok(())
    }

    pub fn find_member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    /// Appends `book_id` to the member's list. Does not check for duplicates;
    /// `Library::issue_book` is the guarded entry point.
    pub fn record_issue(&mut self, member_id: MemberId, book_id: BookId) -> Result<()> {
        self.member_mut(member_id)?.issued_books.push(book_id);
        Ok(())
    }

    /// Removes the first occurrence of `book_id`. Returns whether anything was removed.
    pub fn record_return(&mut self, member_id: MemberId, book_id: BookId) -> Result<bool> {
        let member = self.member_mut(member_id)?;
        match member.issued_books.iter().position(|id| *id == book_id) {
            Some(index) => {
                member.issued_books.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The first member, by id, whose list contains `book_id`.
    pub fn holder_of(&self, book_id: BookId) -> Option<MemberId> {
        self.members
            .values()
            .find(|member| member.holds(book_id))
            .map(|member| member.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn member_mut(&mut self, id: MemberId) -> Result<&mut Member> {
        self.members
            .get_mut(&id)
            .ok_or_else(|| LibraryError::not_found(Entity::Member, id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_1000_and_increase() {
        let mut membership = Membership::new();
        let first = membership.add_member("Alice", "a@x.com").unwrap();
        let second = membership.add_member("Bob", "b@x.com").unwrap();

        assert_eq!(first, MemberId(1000));
        assert_eq!(second, MemberId(1001));
        assert_eq!(membership.find_member(second).unwrap().name, "Bob");
        assert!(membership.find_member(MemberId(1002)).is_none());
    }

    #[test]
    fn test_record_return_removes_first_occurrence_only() {
        let mut membership = Membership::new();
        let id = membership.add_member("Alice", "a@x.com").unwrap();
        membership.record_issue(id, BookId(100)).unwrap();
        membership.record_issue(id, BookId(101)).unwrap();
        membership.record_issue(id, BookId(100)).unwrap();

        assert!(membership.record_return(id, BookId(100)).unwrap());
        assert_eq!(
            membership.find_member(id).unwrap().issued_books,
            vec![BookId(101), BookId(100)]
        );
        assert!(!membership.record_return(id, BookId(555)).unwrap());
    }

    #[test]
    fn test_unknown_member_is_not_found() {
        let mut membership = Membership::new();
        assert!(matches!(
            membership.record_issue(MemberId(1000), BookId(100)),
            Err(LibraryError::NotFound { entity: Entity::Member, .. })
        ));
    }

    #[test]
    fn test_restore_keeps_issued_books_and_advances_counter() {
        let mut membership = Membership::new();
        let mut member = Member::new(MemberId(1005), "Carol", "c@x.com");
        member.issued_books.push(BookId(103));
        membership.restore(member).unwrap();

        assert_eq!(membership.holder_of(BookId(103)), Some(MemberId(1005)));
        assert_eq!(membership.add_member("Dan", "d@x.com").unwrap(), MemberId(1006));
    }
}
