//! `Host` backed by SPL-token CPIs. Token accounts are resolved among the
//! instruction's signers and remaining accounts.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::invoke_signed;
use anchor_spl::token::{self, TokenAccount};

use crate::error::ErrorCode;
use crate::ledger::{Host, LockerEvent};

pub struct CpiHost<'a, 'info> {
    token_program: AccountInfo<'info>,
    locker_signer: AccountInfo<'info>,
    signer_seeds: &'a [&'a [u8]],
    accounts: Vec<AccountInfo<'info>>,
}

impl<'a, 'info> CpiHost<'a, 'info> {
    pub fn new(
        token_program: AccountInfo<'info>,
        locker_signer: AccountInfo<'info>,
        signer_seeds: &'a [&'a [u8]],
        accounts: Vec<AccountInfo<'info>>,
    ) -> Self {
        CpiHost {
            token_program,
            locker_signer,
            signer_seeds,
            accounts,
        }
    }

    fn account(&self, key: &Pubkey) -> Result<AccountInfo<'info>> {
        self.accounts
            .iter()
            .find(|info| info.key == key)
            .cloned()
            .ok_or_else(|| error!(ErrorCode::TokenAccountNotFound))
    }

    /// The associated token account of `owner` when supplied, otherwise any
    /// supplied token account with the right mint and owner.
    fn token_account(&self, mint: &Pubkey, owner: &Pubkey) -> Result<AccountInfo<'info>> {
        let associated = spl_associated_token_account::get_associated_token_address(owner, mint);
        if let Ok(info) = self.account(&associated) {
            return Ok(info);
        }
        self.accounts
            .iter()
            .find(|info| {
                *info.owner == token::ID
                    && Account::<TokenAccount>::try_from(info)
                        .map_or(false, |t| t.mint == *mint && t.owner == *owner)
            })
            .cloned()
            .ok_or_else(|| error!(ErrorCode::TokenAccountNotFound))
    }

    fn vault(&self, mint: &Pubkey) -> Result<AccountInfo<'info>> {
        let signer = *self.locker_signer.key;
        self.token_account(mint, &signer)
    }

    /// Moves `amount` out of the vault for `mint`, signed by the locker PDA.
    fn pay(&self, mint: &Pubkey, destination: AccountInfo<'info>, amount: u64) -> Result<()> {
        let vault = self.vault(mint)?;
        let ix = spl_token::instruction::transfer(
            &spl_token::ID,
            vault.key,
            destination.key,
            self.locker_signer.key,
            &[self.locker_signer.key],
            amount,
        )?;
        invoke_signed(
            &ix,
            &[
                self.token_program.clone(),
                vault,
                destination,
                self.locker_signer.clone(),
            ],
            &[self.signer_seeds],
        )?;
        Ok(())
    }
}

impl<'a, 'info> Host for CpiHost<'a, 'info> {
    fn transfer_in(&mut self, mint: &Pubkey, from: &Pubkey, amount: u64) -> Result<()> {
        let cpi_ctx = CpiContext::new(
            self.token_program.clone(),
            token::Transfer {
                from: self.token_account(mint, from)?,
                to: self.vault(mint)?,
                authority: self.account(from)?,
            },
        );
        token::transfer(cpi_ctx, amount)
    }

    fn transfer_out(&mut self, mint: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let destination = self.token_account(mint, to)?;
        self.pay(mint, destination, amount)
    }

    /// `pool` is the deposit token account of the compounding pool.
    fn stake_for(&mut self, mint: &Pubkey, pool: &Pubkey, beneficiary: &Pubkey, amount: u64) -> Result<()> {
        let destination = self.account(pool)?;
        self.pay(mint, destination, amount)?;
        msg!("compounded {} into {} for {}", amount, pool, beneficiary);
        Ok(())
    }

    /// Only executable accounts count as code. The account must be supplied.
    fn is_contract(&self, account: &Pubkey) -> bool {
        self.accounts
            .iter()
            .any(|info| info.key == account && info.executable)
    }

    fn emit(&mut self, event: LockerEvent) {
        event.emit();
    }
}
