// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact storage operations.

use tracing::debug;

use super::{ActiveTransfers, ContactStore, StorageError, TransferTracker};
use crate::contact::{Contact, ContactActivity, ContactState, Millis, PresenceEvaluator};

fn validate_public_key(public_key: &str) -> Result<(), StorageError> {
    if public_key.is_empty() || public_key.chars().any(char::is_whitespace) {
        return Err(StorageError::InvalidPublicKey(public_key.to_string()));
    }
    Ok(())
}

impl ContactStore {
    // === Contact Operations ===

    /// Creates a contact first seen at `now`.
    ///
    /// Fails if the key is already known, so `known_since` is never reset.
    pub fn create_contact(
        &mut self,
        public_key: &str,
        name: &str,
        address: &str,
        state: ContactState,
        now: Millis,
    ) -> Result<&Contact, StorageError> {
        validate_public_key(public_key)?;
        if self.contacts.contains_key(public_key) {
            return Err(StorageError::AlreadyExists(public_key.to_string()));
        }

        debug!("Creating contact {}", public_key);
        let contact = Contact::new(public_key, name, address, state, now);
        Ok(self
            .contacts
            .entry(public_key.to_string())
            .or_insert(contact))
    }

    /// Inserts or replaces a contact, returning the previous record.
    pub fn put(&mut self, contact: Contact) -> Result<Option<Contact>, StorageError> {
        validate_public_key(contact.public_key())?;
        Ok(self
            .contacts
            .insert(contact.public_key().to_string(), contact))
    }

    /// Returns the contact with the given public key.
    pub fn get(&self, public_key: &str) -> Option<&Contact> {
        self.contacts.get(public_key)
    }

    /// Returns true if the key is known.
    pub fn contains(&self, public_key: &str) -> bool {
        self.contacts.contains_key(public_key)
    }

    /// Returns the number of contacts.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Returns true if the store holds no contacts.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Lists all contacts ordered by name, then public key.
    pub fn list(&self) -> Vec<&Contact> {
        let mut contacts: Vec<&Contact> = self.contacts.values().collect();
        contacts.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.public_key().cmp(b.public_key()))
        });
        contacts
    }

    /// Sets the most recent known contact time.
    ///
    /// The value replaces the stored one as given; it is not required to be
    /// later than the previous value.
    pub fn update_last_seen(
        &mut self,
        public_key: &str,
        last_seen: Millis,
    ) -> Result<(), StorageError> {
        self.contact_mut(public_key)?.set_last_seen(last_seen);
        Ok(())
    }

    /// Renames a contact.
    pub fn update_name(&mut self, public_key: &str, name: &str) -> Result<(), StorageError> {
        self.contact_mut(public_key)?.set_name(name.to_string());
        Ok(())
    }

    /// Replaces a contact's application-defined status.
    pub fn update_state(
        &mut self,
        public_key: &str,
        state: ContactState,
    ) -> Result<(), StorageError> {
        self.contact_mut(public_key)?.set_state(state);
        Ok(())
    }

    fn contact_mut(&mut self, public_key: &str) -> Result<&mut Contact, StorageError> {
        self.contacts
            .get_mut(public_key)
            .ok_or_else(|| StorageError::NotFound(public_key.to_string()))
    }

    // === Transfer Operations ===

    /// Marks a transfer to a known contact as started.
    ///
    /// Returns false if one was already in flight.
    pub fn begin_transfer(&mut self, public_key: &str) -> Result<bool, StorageError> {
        if !self.contains(public_key) {
            return Err(StorageError::NotFound(public_key.to_string()));
        }
        Ok(self.transfers.begin(public_key))
    }

    /// Clears the transfer marker for `public_key`.
    pub fn finish_transfer(&mut self, public_key: &str) -> bool {
        self.transfers.finish(public_key)
    }

    /// Returns the in-flight transfer markers.
    pub fn transfers(&self) -> &ActiveTransfers {
        &self.transfers
    }

    // === Presence Queries ===

    /// Lists contacts online at `now`, ordered like [`list`](Self::list).
    pub fn online(&self, now: Millis, evaluator: &PresenceEvaluator) -> Vec<&Contact> {
        self.list()
            .into_iter()
            .filter(|contact| evaluator.is_online(contact, now))
            .collect()
    }

    /// Classifies a known contact at `now`.
    pub fn activity(
        &self,
        public_key: &str,
        now: Millis,
        evaluator: &PresenceEvaluator,
    ) -> Option<ContactActivity> {
        self.get(public_key)
            .map(|contact| evaluator.activity(contact, now, &self.transfers))
    }
}

impl TransferTracker for ContactStore {
    fn is_transferring(&self, public_key: &str) -> bool {
        self.transfers.is_transferring(public_key)
    }
}
