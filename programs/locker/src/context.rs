use crate::account::*;
use crate::constants::DELEGATE_SEED;
use crate::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_lang::solana_program::sysvar::instructions;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
#[instruction(nonce: u8)]
pub struct InitializeLocker<'info> {
    /// CHECK: nothing to check.
    pub authority: AccountInfo<'info>,

    pub staking_mint: Box<Account<'info, Mint>>,
    #[account(
        constraint = staking_vault.mint == staking_mint.key(),
        constraint = staking_vault.owner == locker_signer.key(),
        // nobody else may close the vault
        constraint = staking_vault.close_authority == COption::None,
    )]
    pub staking_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        seeds = [
            locker.to_account_info().key.as_ref()
        ],
        bump = nonce,
    )]
    /// CHECK: nothing to check.
    pub locker_signer: AccountInfo<'info>,

    #[account(
        zero,
    )]
    pub locker: Box<Account<'info, Locker>>,
}

/// Accounts for every ledger call. Token accounts involved in a transfer
/// (the caller's, the vaults, recipients, a compounding pool, or an account
/// being blacklisted) are passed as remaining accounts.
#[derive(Accounts)]
pub struct LockerCall<'info> {
    #[account(mut)]
    pub locker: Box<Account<'info, Locker>>,

    // Program signers.
    #[account(
        seeds = [
            locker.to_account_info().key.as_ref()
        ],
        bump = locker.nonce,
    )]
    /// CHECK: nothing to check.
    pub locker_signer: AccountInfo<'info>,

    // Caller. A program calling through CPI signs with its own address here.
    pub owner: Signer<'info>,
    // Transaction fee payer; also pays rent as the ledgers grow.
    #[account(mut)]
    pub payer: Signer<'info>,

    // Misc.
    #[account(address = instructions::ID)]
    /// CHECK: instructions sysvar, read to find a calling program.
    pub instructions: AccountInfo<'info>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// A [`LockerCall`] against one account's ledger. Delegate ledgers the call
/// touches are passed as remaining accounts.
#[derive(Accounts)]
pub struct UserCall<'info> {
    pub call: LockerCall<'info>,

    #[account(
        mut,
        constraint = user_ledger.locker == call.locker.key() @ ErrorCode::LedgerMismatch,
        seeds = [
            user_ledger.owner.as_ref(),
            call.locker.to_account_info().key.as_ref()
        ],
        bump = user_ledger.nonce,
    )]
    pub user_ledger: Box<Account<'info, UserLedger>>,
}

#[derive(Accounts)]
pub struct CreateUserLedger<'info> {
    pub locker: Box<Account<'info, Locker>>,
    #[account(
        init,
        payer = payer,
        space = UserLedger::SIZE,
        seeds = [
            owner.key.as_ref(),
            locker.to_account_info().key.as_ref()
        ],
        bump
    )]
    pub user_ledger: Box<Account<'info, UserLedger>>,
    /// CHECK: anyone may hold locks, including accounts that never sign.
    pub owner: AccountInfo<'info>,
    #[account(mut)]
    pub payer: Signer<'info>,
    // Misc.
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct CreateDelegateLedger<'info> {
    pub locker: Box<Account<'info, Locker>>,
    #[account(
        init,
        payer = payer,
        space = DelegateLedger::SIZE,
        seeds = [
            DELEGATE_SEED,
            delegate.key.as_ref(),
            locker.to_account_info().key.as_ref()
        ],
        bump
    )]
    pub delegate_ledger: Box<Account<'info, DelegateLedger>>,
    /// CHECK: any account may receive votes.
    pub delegate: AccountInfo<'info>,
    #[account(mut)]
    pub payer: Signer<'info>,
    // Misc.
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct CloseUserLedger<'info> {
    #[account(mut)]
    pub locker: Box<Account<'info, Locker>>,
    #[account(
        mut,
        close = owner,
        has_one = owner,
        has_one = locker,
        seeds = [
            owner.key.as_ref(),
            locker.to_account_info().key.as_ref()
        ],
        bump = user_ledger.nonce,
    )]
    pub user_ledger: Account<'info, UserLedger>,
    #[account(mut)]
    pub owner: Signer<'info>,
}

#[derive(Accounts)]
pub struct CheckpointEpoch<'info> {
    #[account(mut)]
    pub locker: Box<Account<'info, Locker>>,
    #[account(mut)]
    pub payer: Signer<'info>,
    pub system_program: Program<'info, System>,
}
