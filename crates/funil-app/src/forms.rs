// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::LeadStatus;

/// Origin tag stamped on manually registered leads, distinguishing them from
/// leads created through the external webhook intake.
pub const MANUAL_ORIGIN: &str = "Cadastro Manual";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadFormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl LeadFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("lead name is required -- enter a name and retry");
        }
        if self.email.trim().is_empty() {
            bail!("primary email is required -- enter an email and retry");
        }
        if !self.email.contains('@') {
            bail!("primary email looks invalid -- check the address and retry");
        }
        if self.phone.trim().is_empty() {
            bail!("primary phone is required -- enter a phone number and retry");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionFormInput {
    pub note: String,
    pub status: LeadStatus,
}

impl InteractionFormInput {
    /// An empty note means the submit is a no-op, not an error; `has_note`
    /// is the gate and `validate` backs it up at the runtime boundary.
    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.has_note() {
            bail!("interaction note is empty -- write a note and retry");
        }
        Ok(())
    }
}
