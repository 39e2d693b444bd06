pub mod account;
pub mod constants;
pub mod context;
pub mod error;
pub mod host;
pub mod ledger;
pub mod utils;

use account::*;
use anchor_lang::prelude::*;
use context::*;
use ledger::{LockerParams, RewardSelection};
use utils::*;

declare_id!("B1syYRLEHhF2VQWeVa7eXrwZWvweP1q22qe59S19nQDL");

#[program]
pub mod locker {
    use super::*;

    pub fn initialize_locker(
        ctx: Context<InitializeLocker>,
        nonce: u8,
        params: LockerParams,
    ) -> Result<()> {
        let locker = Locker::new(
            ctx.accounts.authority.key(),
            nonce,
            ctx.accounts.staking_mint.key(),
            ctx.accounts.staking_vault.key(),
            params,
            now()?,
        )?;
        **ctx.accounts.locker = locker;
        msg!(
            "locker initialized: {}s epochs, {} epoch locks",
            params.epoch_duration,
            params.lock_epochs
        );
        Ok(())
    }

    pub fn create_user_ledger(ctx: Context<CreateUserLedger>) -> Result<()> {
        let user_ledger = &mut ctx.accounts.user_ledger;
        ***user_ledger = UserLedger::new(
            ctx.accounts.locker.key(),
            ctx.accounts.owner.key(),
            *ctx.bumps.get("user_ledger").ok_or(crate::error::ErrorCode::LedgerMismatch)?,
        );
        Ok(())
    }

    pub fn create_delegate_ledger(ctx: Context<CreateDelegateLedger>) -> Result<()> {
        let delegate_ledger = &mut ctx.accounts.delegate_ledger;
        ***delegate_ledger = DelegateLedger::new(
            ctx.accounts.locker.key(),
            ctx.accounts.delegate.key(),
            *ctx.bumps.get("delegate_ledger").ok_or(crate::error::ErrorCode::LedgerMismatch)?,
        );
        Ok(())
    }

    pub fn close_user_ledger(ctx: Context<CloseUserLedger>) -> Result<()> {
        let env = ledger::Env::direct(ctx.accounts.owner.key(), now()?);
        ctx.accounts
            .locker
            .close_user_ledger(&env, &mut ctx.accounts.user_ledger)
    }

    /// Locks `amount` of the signer's tokens for the owner of the user ledger.
    pub fn lock<'info>(ctx: Context<'_, '_, '_, 'info, UserCall<'info>>, amount: u64) -> Result<()> {
        run_user_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, user, delegates, host| {
            locker.lock(env, user, amount, delegates, host)
        })
    }

    pub fn process_expired_locks<'info>(
        ctx: Context<'_, '_, '_, 'info, UserCall<'info>>,
        relock: bool,
    ) -> Result<()> {
        run_user_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, user, delegates, host| {
            locker.process_expired_locks(env, user, relock, delegates, host)
        })
    }

    pub fn kick_expired_locks<'info>(ctx: Context<'_, '_, '_, 'info, UserCall<'info>>) -> Result<()> {
        run_user_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, user, delegates, host| {
            locker.kick_expired_locks(env, user, delegates, host)
        })
    }

    pub fn emergency_withdraw<'info>(ctx: Context<'_, '_, '_, 'info, UserCall<'info>>) -> Result<()> {
        run_user_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, user, delegates, host| {
            locker.emergency_withdraw(env, user, delegates, host)
        })
    }

    /// Both the previous and the new delegate's ledgers are passed as
    /// remaining accounts.
    pub fn delegate<'info>(
        ctx: Context<'_, '_, '_, 'info, UserCall<'info>>,
        to: Pubkey,
    ) -> Result<()> {
        run_user_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, user, delegates, host| {
            locker.delegate(env, user, to, delegates, host)
        })
    }

    pub fn get_reward<'info>(
        ctx: Context<'_, '_, '_, 'info, UserCall<'info>>,
        selection: RewardSelection,
        compound: bool,
    ) -> Result<()> {
        run_user_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, user, _, host| {
            locker.get_reward(env, user, selection, compound, host)
        })
    }

    pub fn queue_new_rewards<'info>(
        ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>,
        mint: Pubkey,
        amount: u64,
    ) -> Result<()> {
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.queue_new_rewards(env, mint, amount, host)
        })
    }

    pub fn checkpoint_epoch(ctx: Context<CheckpointEpoch>) -> Result<()> {
        ctx.accounts.locker.checkpoint_epoch(now()?);
        fit_account(
            &ctx.accounts.locker,
            ctx.accounts.payer.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        )
    }

    pub fn add_reward<'info>(
        ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>,
        mint: Pubkey,
        distributor: Pubkey,
    ) -> Result<()> {
        msg!("adding reward {} for distributor {}", mint, distributor);
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.add_reward(env, mint, distributor, host)
        })
    }

    pub fn approve_reward_distributor<'info>(
        ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>,
        mint: Pubkey,
        distributor: Pubkey,
        approved: bool,
    ) -> Result<()> {
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.approve_reward_distributor(env, mint, distributor, approved, host)
        })
    }

    pub fn set_kick_incentive<'info>(
        ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>,
        rate: u64,
        delay: u64,
    ) -> Result<()> {
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.set_kick_incentive(env, rate, delay, host)
        })
    }

    pub fn modify_blacklist<'info>(
        ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>,
        account: Pubkey,
        blacklisted: bool,
    ) -> Result<()> {
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.modify_blacklist(env, account, blacklisted, host)
        })
    }

    pub fn set_depositor_whitelist<'info>(
        ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>,
        account: Pubkey,
        whitelisted: bool,
    ) -> Result<()> {
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.set_depositor_whitelist(env, account, whitelisted, host)
        })
    }

    /// Both `mint` and `pool` set designates the compounding target; either
    /// missing disables compounding.
    pub fn set_compound_target<'info>(
        ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>,
        mint: Option<Pubkey>,
        pool: Option<Pubkey>,
    ) -> Result<()> {
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.set_compound_target(env, mint.zip(pool), host)
        })
    }

    pub fn recover_token<'info>(
        ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>,
        mint: Pubkey,
        amount: u64,
    ) -> Result<()> {
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.recover_token(env, mint, amount, host)
        })
    }

    pub fn shutdown<'info>(ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>) -> Result<()> {
        msg!("shutting down locker {}", ctx.accounts.locker.key());
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.shutdown(env, host)
        })
    }

    pub fn transfer_ownership<'info>(
        ctx: Context<'_, '_, '_, 'info, LockerCall<'info>>,
        authority: Pubkey,
    ) -> Result<()> {
        run_ledger(ctx.accounts, ctx.remaining_accounts, |locker, env, host| {
            locker.transfer_ownership(env, authority, host)
        })
    }
}
