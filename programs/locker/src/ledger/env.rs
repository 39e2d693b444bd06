use anchor_lang::prelude::*;

use super::events::LockerEvent;
use crate::account::DelegateLedger;

/// Who is calling and when.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Env {
    /// Signer on whose behalf the call runs.
    pub sender: Pubkey,
    /// Program that invoked the locker through CPI, if any.
    pub caller: Option<Pubkey>,
    /// Unix timestamp of the call.
    pub now: u64,
}

impl Env {
    pub fn new(sender: Pubkey, caller: Option<Pubkey>, now: u64) -> Self {
        Env { sender, caller, now }
    }

    /// Top-level instruction signed by `signer`.
    pub fn direct(signer: Pubkey, now: u64) -> Self {
        Env::new(signer, None, now)
    }

    /// Cross-program invocation from `program`, signed by `signer`.
    pub fn via_program(signer: Pubkey, program: Pubkey, now: u64) -> Self {
        Env::new(signer, Some(program), now)
    }
}

/// Everything the ledger needs from the outside world.
///
/// Implemented over SPL-token CPIs on-chain and by an in-memory mock in tests.
/// A failing transfer must be returned, never swallowed.
pub trait Host {
    /// Moves `amount` of `mint` from `from` into the locker's vault.
    fn transfer_in(&mut self, mint: &Pubkey, from: &Pubkey, amount: u64) -> Result<()>;

    /// Pays `amount` of `mint` from the locker's vault to `to`.
    fn transfer_out(&mut self, mint: &Pubkey, to: &Pubkey, amount: u64) -> Result<()>;

    /// Deposits `amount` of `mint` into `pool` on behalf of `beneficiary`.
    fn stake_for(&mut self, mint: &Pubkey, pool: &Pubkey, beneficiary: &Pubkey, amount: u64) -> Result<()>;

    /// Whether `account` is program code rather than a wallet.
    fn is_contract(&self, account: &Pubkey) -> bool;

    fn emit(&mut self, event: LockerEvent);
}

/// Delegate ledgers touched by a call, looked up by delegate.
pub trait Delegates {
    fn ledger(&mut self, delegate: &Pubkey) -> Result<&mut DelegateLedger>;
}
