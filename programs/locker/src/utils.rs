use crate::account::{DelegateLedger, Footprint, Locker, UserLedger};
use crate::context::{LockerCall, UserCall};
use crate::error::ErrorCode;
use crate::host::CpiHost;
use crate::ledger::{Delegates, Env};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::{clock, sysvar};
use anchor_lang::system_program;
use std::convert::TryFrom;

pub fn now() -> Result<u64> {
    let clock = clock::Clock::get()?;
    Ok(u64::try_from(clock.unix_timestamp).map_err(|_| ErrorCode::MathOverflow)?)
}

/// Program that invoked the locker through CPI, read from the top-level
/// instruction. `None` when the locker was called directly.
pub fn calling_program(instructions: &AccountInfo) -> Result<Option<Pubkey>> {
    let current = sysvar::instructions::get_instruction_relative(0, instructions)?;
    Ok(Some(current.program_id).filter(|program| *program != crate::ID))
}

/// Grows an account to fit its state, topping up rent from `payer`.
pub fn fit_account<'info, T>(
    account: &Account<'info, T>,
    payer: AccountInfo<'info>,
    system: AccountInfo<'info>,
) -> Result<()>
where
    T: AccountSerialize + AccountDeserialize + Owner + Clone + Footprint,
{
    let info = account.to_account_info();
    let needed = account.space();
    if needed <= info.data_len() {
        return Ok(());
    }

    let shortfall = Rent::get()?
        .minimum_balance(needed)
        .saturating_sub(info.lamports());
    if shortfall > 0 {
        let cpi_ctx = CpiContext::new(
            system,
            system_program::Transfer {
                from: payer,
                to: info.clone(),
            },
        );
        system_program::transfer(cpi_ctx, shortfall)?;
    }
    info.realloc(needed, false)?;
    Ok(())
}

/// Delegate ledgers found among the remaining accounts, loaded on first use
/// and written back by [`DelegateAccounts::persist`].
pub struct DelegateAccounts<'info> {
    locker: Pubkey,
    candidates: Vec<AccountInfo<'info>>,
    loaded: Vec<Account<'info, DelegateLedger>>,
}

impl<'info> DelegateAccounts<'info> {
    pub fn new(locker: Pubkey, remaining: &[AccountInfo<'info>]) -> Self {
        DelegateAccounts {
            locker,
            candidates: remaining
                .iter()
                .filter(|info| *info.owner == crate::ID && info.is_writable)
                .cloned()
                .collect(),
            loaded: vec![],
        }
    }

    pub fn persist(&self, payer: &AccountInfo<'info>, system: &AccountInfo<'info>) -> Result<()> {
        for account in &self.loaded {
            fit_account(account, payer.clone(), system.clone())?;
            account.exit(&crate::ID)?;
        }
        Ok(())
    }
}

impl<'info> Delegates for DelegateAccounts<'info> {
    fn ledger(&mut self, delegate: &Pubkey) -> Result<&mut DelegateLedger> {
        if let Some(i) = self.loaded.iter().position(|a| a.delegate == *delegate) {
            return Ok(&mut *self.loaded[i]);
        }
        let locker = self.locker;
        let account = self
            .candidates
            .iter()
            .filter_map(|info| Account::<DelegateLedger>::try_from(info).ok())
            .find(|a| a.delegate == *delegate && a.locker == locker)
            .ok_or(ErrorCode::DelegateLedgerNotFound)?;
        self.loaded.push(account);
        let last = self.loaded.len() - 1;
        Ok(&mut *self.loaded[last])
    }
}

fn cpi_host<'a, 'info>(
    accounts: &LockerCall<'info>,
    seeds: &'a [&'a [u8]],
    remaining: &[AccountInfo<'info>],
) -> CpiHost<'a, 'info> {
    let signers = [accounts.owner.to_account_info(), accounts.payer.to_account_info()];
    CpiHost::new(
        accounts.token_program.to_account_info(),
        accounts.locker_signer.clone(),
        seeds,
        signers.iter().chain(remaining).cloned().collect(),
    )
}

fn call_env(accounts: &LockerCall) -> Result<Env> {
    Ok(Env::new(
        accounts.owner.key(),
        calling_program(&accounts.instructions)?,
        now()?,
    ))
}

/// Runs one locker-wide operation for the accounts of a [`LockerCall`]. The
/// owner signer is the caller.
pub fn run_ledger<'info, F>(
    accounts: &mut LockerCall<'info>,
    remaining: &[AccountInfo<'info>],
    op: F,
) -> Result<()>
where
    F: FnOnce(&mut Locker, &Env, &mut CpiHost<'_, 'info>) -> Result<()>,
{
    let env = call_env(accounts)?;
    let locker_key = accounts.locker.key();
    let seeds = &[locker_key.as_ref(), &[accounts.locker.nonce]];
    let mut host = cpi_host(accounts, &seeds[..], remaining);
    op(&mut **accounts.locker, &env, &mut host)?;

    fit_account(
        &accounts.locker,
        accounts.payer.to_account_info(),
        accounts.system_program.to_account_info(),
    )
}

/// Runs one operation on a user ledger, writing back every delegate ledger it
/// touched.
pub fn run_user_ledger<'info, F>(
    accounts: &mut UserCall<'info>,
    remaining: &[AccountInfo<'info>],
    op: F,
) -> Result<()>
where
    F: FnOnce(&mut Locker, &Env, &mut UserLedger, &mut DelegateAccounts<'info>, &mut CpiHost<'_, 'info>) -> Result<()>,
{
    let env = call_env(&accounts.call)?;
    let locker_key = accounts.call.locker.key();
    let seeds = &[locker_key.as_ref(), &[accounts.call.locker.nonce]];
    let mut host = cpi_host(&accounts.call, &seeds[..], remaining);
    let mut delegates = DelegateAccounts::new(locker_key, remaining);
    op(
        &mut **accounts.call.locker,
        &env,
        &mut **accounts.user_ledger,
        &mut delegates,
        &mut host,
    )?;

    let payer = accounts.call.payer.to_account_info();
    let system = accounts.call.system_program.to_account_info();
    fit_account(&accounts.call.locker, payer.clone(), system.clone())?;
    fit_account(&accounts.user_ledger, payer.clone(), system.clone())?;
    delegates.persist(&payer, &system)
}
