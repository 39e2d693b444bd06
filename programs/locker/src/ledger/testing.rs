//! In-memory host and a fixture that drives the ledger the way the runtime
//! would: one atomic call at a time against an advancing clock.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_error::ProgramError;
use std::collections::{BTreeMap, BTreeSet};

use super::env::{Delegates, Env, Host};
use super::events::LockerEvent;
use super::invariants::check_invariants;
use super::LockerParams;
use crate::account::{DelegateLedger, Locker, UserLedger};
use crate::error::ErrorCode;

pub const WEEK: u64 = 604_800;
/// Start of an arbitrary epoch far from zero.
pub const GENESIS: u64 = 2_800 * WEEK;

#[derive(Clone, Debug, Default)]
pub struct MockHost {
    /// (mint, owner) -> balance held outside the locker.
    pub wallets: BTreeMap<(Pubkey, Pubkey), u64>,
    /// mint -> balance held by the locker.
    pub vault: BTreeMap<Pubkey, u64>,
    /// (mint, pool, beneficiary, amount)
    pub staked: Vec<(Pubkey, Pubkey, Pubkey, u64)>,
    pub contracts: BTreeSet<Pubkey>,
    pub events: Vec<LockerEvent>,
}

impl MockHost {
    pub fn fund(&mut self, mint: Pubkey, owner: Pubkey, amount: u64) {
        *self.wallets.entry((mint, owner)).or_default() += amount;
    }

    pub fn wallet(&self, mint: &Pubkey, owner: &Pubkey) -> u64 {
        self.wallets.get(&(*mint, *owner)).copied().unwrap_or(0)
    }

    pub fn vault_balance(&self, mint: &Pubkey) -> u64 {
        self.vault.get(mint).copied().unwrap_or(0)
    }

    pub fn take_events(&mut self) -> Vec<LockerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Host for MockHost {
    fn transfer_in(&mut self, mint: &Pubkey, from: &Pubkey, amount: u64) -> Result<()> {
        let balance = self.wallets.entry((*mint, *from)).or_default();
        if *balance < amount {
            return Err(ProgramError::InsufficientFunds.into());
        }
        *balance -= amount;
        *self.vault.entry(*mint).or_default() += amount;
        Ok(())
    }

    fn transfer_out(&mut self, mint: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let vault = self.vault.entry(*mint).or_default();
        if *vault < amount {
            return Err(ProgramError::InsufficientFunds.into());
        }
        *vault -= amount;
        *self.wallets.entry((*mint, *to)).or_default() += amount;
        Ok(())
    }

    fn stake_for(&mut self, mint: &Pubkey, pool: &Pubkey, beneficiary: &Pubkey, amount: u64) -> Result<()> {
        let vault = self.vault.entry(*mint).or_default();
        if *vault < amount {
            return Err(ProgramError::InsufficientFunds.into());
        }
        *vault -= amount;
        self.staked.push((*mint, *pool, *beneficiary, amount));
        Ok(())
    }

    fn is_contract(&self, account: &Pubkey) -> bool {
        self.contracts.contains(account)
    }

    fn emit(&mut self, event: LockerEvent) {
        self.events.push(event);
    }
}

/// Delegate ledgers keyed by delegate, opened on first use like the
/// `create_delegate_ledger` instruction would.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DelegateBook {
    pub locker: Pubkey,
    pub ledgers: BTreeMap<Pubkey, DelegateLedger>,
}

impl Delegates for DelegateBook {
    fn ledger(&mut self, delegate: &Pubkey) -> Result<&mut DelegateLedger> {
        let locker = self.locker;
        Ok(self
            .ledgers
            .entry(*delegate)
            .or_insert_with(|| DelegateLedger::new(locker, *delegate, 255)))
    }
}

#[derive(Clone)]
struct Snapshot {
    locker: Locker,
    users: BTreeMap<Pubkey, UserLedger>,
    delegates: DelegateBook,
    host: MockHost,
}

pub struct Fixture {
    pub locker_key: Pubkey,
    pub locker: Locker,
    pub users: BTreeMap<Pubkey, UserLedger>,
    pub delegates: DelegateBook,
    pub host: MockHost,
    pub now: u64,
    pub admin: Pubkey,
    pub staking_mint: Pubkey,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture::with_params(LockerParams::default())
    }

    pub fn with_params(params: LockerParams) -> Self {
        let admin = Pubkey::new_unique();
        let staking_mint = Pubkey::new_unique();
        let locker_key = Pubkey::new_unique();
        let now = (GENESIS / params.epoch_duration) * params.epoch_duration + 1;
        let locker = Locker::new(admin, 255, staking_mint, Pubkey::new_unique(), params, now).unwrap();
        Fixture {
            locker_key,
            locker,
            users: BTreeMap::new(),
            delegates: DelegateBook {
                locker: locker_key,
                ledgers: BTreeMap::new(),
            },
            host: MockHost::default(),
            now,
            admin,
            staking_mint,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.locker.epoch_at(self.now)
    }

    pub fn advance(&mut self, seconds: u64) {
        self.now += seconds;
    }

    pub fn advance_epochs(&mut self, epochs: u64) {
        self.now += epochs * self.locker.epoch_duration;
    }

    /// Runs one locker-wide call as `sender`.
    pub fn call<T, F>(&mut self, sender: Pubkey, op: F) -> Result<T>
    where
        F: FnOnce(&mut Locker, &Env, &mut MockHost) -> Result<T>,
    {
        let env = Env::direct(sender, self.now);
        self.atomically(|f| op(&mut f.locker, &env, &mut f.host))
    }

    /// Runs one call as `sender` against `account`'s ledger, opening it first
    /// if needed.
    pub fn call_on<T, F>(&mut self, sender: Pubkey, account: Pubkey, op: F) -> Result<T>
    where
        F: FnOnce(&mut Locker, &Env, &mut UserLedger, &mut DelegateBook, &mut MockHost) -> Result<T>,
    {
        let env = Env::direct(sender, self.now);
        self.call_on_as(env, account, op)
    }

    pub fn call_on_as<T, F>(&mut self, env: Env, account: Pubkey, op: F) -> Result<T>
    where
        F: FnOnce(&mut Locker, &Env, &mut UserLedger, &mut DelegateBook, &mut MockHost) -> Result<T>,
    {
        let locker_key = self.locker_key;
        self.atomically(|f| {
            let user = f
                .users
                .entry(account)
                .or_insert_with(|| UserLedger::new(locker_key, account, 255));
            op(&mut f.locker, &env, user, &mut f.delegates, &mut f.host)
        })
    }

    /// A failed call leaves every ledger and the host untouched; the
    /// invariants are checked after every call.
    fn atomically<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Fixture) -> Result<T>,
    {
        let before = Snapshot {
            locker: self.locker.clone(),
            users: self.users.clone(),
            delegates: self.delegates.clone(),
            host: self.host.clone(),
        };
        let outcome = op(self);
        if outcome.is_err() {
            self.locker = before.locker;
            self.users = before.users;
            self.delegates = before.delegates;
            self.host = before.host;
        }
        check_invariants(&self.locker, self.users.values(), self.delegates.ledgers.values()).unwrap();
        outcome
    }

    pub fn user(&mut self, balance: u64) -> Pubkey {
        let user = Pubkey::new_unique();
        self.host.fund(self.staking_mint, user, balance);
        user
    }

    pub fn ledger(&self, owner: &Pubkey) -> &UserLedger {
        &self.users[owner]
    }

    pub fn balance(&self, owner: &Pubkey) -> u64 {
        self.users.get(owner).map_or(0, |u| u.locked)
    }

    pub fn lock(&mut self, user: Pubkey, amount: u64) -> Result<()> {
        self.call_on(user, user, |l, env, u, d, h| l.lock(env, u, amount, d, h))
    }

    pub fn add_reward(&mut self, distributor: Pubkey) -> Pubkey {
        let mint = Pubkey::new_unique();
        let admin = self.admin;
        self.call(admin, |l, env, h| l.add_reward(env, mint, distributor, h))
            .unwrap();
        mint
    }

    pub fn queue(&mut self, mint: Pubkey, distributor: Pubkey, amount: u64) -> Result<()> {
        self.host.fund(mint, distributor, amount);
        self.call(distributor, |l, env, h| l.queue_new_rewards(env, mint, amount, h))
    }

    pub fn delegate_ledger(&self, delegate: &Pubkey) -> Option<&DelegateLedger> {
        self.delegates.ledgers.get(delegate)
    }

    pub fn votes(&self, account: &Pubkey) -> u64 {
        self.delegate_ledger(account)
            .map_or(0, |d| self.locker.get_votes(d, self.now).unwrap())
    }

    pub fn past_votes(&self, account: &Pubkey, timestamp: u64) -> Result<u64> {
        match self.delegate_ledger(account) {
            Some(d) => self.locker.get_past_votes(d, timestamp, self.now),
            None => Ok(0),
        }
    }
}

/// Asserts that `outcome` failed with exactly `expected`.
pub fn assert_error<T: std::fmt::Debug>(outcome: Result<T>, expected: ErrorCode) {
    match outcome {
        Err(anchor_lang::error::Error::AnchorError(e)) => {
            assert_eq!(e.error_name, format!("{:?}", expected))
        }
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}
