//! Blacklist and depositor checks applied to every lock.

use anchor_lang::prelude::*;

use super::env::Env;
use crate::account::Locker;
use crate::error::ErrorCode;

impl Locker {
    pub fn is_blacklisted(&self, account: &Pubkey) -> bool {
        self.blacklist.binary_search(account).is_ok()
    }

    pub fn is_whitelisted_depositor(&self, account: &Pubkey) -> bool {
        self.depositor_whitelist.binary_search(account).is_ok()
    }

    /// Rejects blacklisted parties, and calling programs locking on behalf
    /// of someone other than the signer without being whitelisted.
    pub(crate) fn check_depositor(&self, env: &Env, recipient: &Pubkey) -> Result<()> {
        require!(!self.is_blacklisted(&env.sender), ErrorCode::Blacklisted);
        require!(!self.is_blacklisted(recipient), ErrorCode::Blacklisted);

        if let Some(program) = env.caller {
            require!(!self.is_blacklisted(&program), ErrorCode::Blacklisted);
            require!(
                *recipient == env.sender || self.is_whitelisted_depositor(&program),
                ErrorCode::DepositorNotWhitelisted
            );
        }
        Ok(())
    }
}
