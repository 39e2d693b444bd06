use anchor_lang::prelude::*;

use super::env::{Env, Host};
use super::events::*;
use super::set_membership;
use crate::account::{Locker, RewardData};
use crate::constants::*;
use crate::error::ErrorCode;

impl Locker {
    /// Registers a new reward stream with its first distributor.
    pub fn add_reward<H: Host>(&mut self, env: &Env, mint: Pubkey, distributor: Pubkey, host: &mut H) -> Result<()> {
        self.only_authority(env)?;
        require!(mint != self.staking_mint, ErrorCode::CannotAddStakingToken);
        require!(self.reward_index(&mint).is_none(), ErrorCode::RewardExists);
        require!(
            self.reward_tokens.len() < MAX_REWARD_TOKENS,
            ErrorCode::MaxRewardTokens
        );

        self.catch_up_to(env.now);
        self.reward_tokens.push(RewardData {
            mint,
            last_update_time: env.now,
            period_finish: env.now,
            distributors: vec![distributor],
            ..RewardData::default()
        });

        host.emit(LockerEvent::RewardTokenAdded(RewardTokenAdded { token: mint, distributor }));
        Ok(())
    }

    pub fn approve_reward_distributor<H: Host>(
        &mut self,
        env: &Env,
        mint: Pubkey,
        distributor: Pubkey,
        approved: bool,
        host: &mut H,
    ) -> Result<()> {
        self.only_authority(env)?;
        let index = self.reward_index(&mint).ok_or(ErrorCode::RewardNotFound)?;

        let distributors = &mut self.reward_tokens[index].distributors;
        let listed = distributors.iter().position(|d| *d == distributor);
        match (listed, approved) {
            (None, true) => distributors.push(distributor),
            (Some(i), false) => {
                distributors.remove(i);
            }
            _ => {}
        }

        host.emit(LockerEvent::DistributorApproved(DistributorApproved {
            token: mint,
            distributor,
            approved,
        }));
        Ok(())
    }

    pub fn set_kick_incentive<H: Host>(&mut self, env: &Env, rate: u64, delay: u64, host: &mut H) -> Result<()> {
        self.only_authority(env)?;
        require!(rate <= MAX_KICK_REWARD_PER_EPOCH, ErrorCode::KickRateTooHigh);
        require!(delay >= MIN_KICK_REWARD_EPOCH_DELAY, ErrorCode::KickDelayTooShort);

        self.kick_reward_per_epoch = rate;
        self.kick_reward_epoch_delay = delay;
        host.emit(LockerEvent::KickIncentiveSet(KickIncentiveSet { rate, delay }));
        Ok(())
    }

    /// Only program accounts can be blacklisted.
    pub fn modify_blacklist<H: Host>(&mut self, env: &Env, account: Pubkey, blacklisted: bool, host: &mut H) -> Result<()> {
        self.only_authority(env)?;
        require!(host.is_contract(&account), ErrorCode::MustBeContract);

        set_membership(&mut self.blacklist, account, blacklisted);
        host.emit(LockerEvent::BlacklistModified(BlacklistModified { account, blacklisted }));
        Ok(())
    }

    pub fn set_depositor_whitelist<H: Host>(
        &mut self,
        env: &Env,
        account: Pubkey,
        whitelisted: bool,
        host: &mut H,
    ) -> Result<()> {
        self.only_authority(env)?;

        set_membership(&mut self.depositor_whitelist, account, whitelisted);
        host.emit(LockerEvent::DepositorWhitelisted(DepositorWhitelisted { account, whitelisted }));
        Ok(())
    }

    /// Designates the reward token that claimers may compound into `pool`.
    /// `None` disables compounding.
    pub fn set_compound_target<H: Host>(&mut self, env: &Env, target: Option<(Pubkey, Pubkey)>, host: &mut H) -> Result<()> {
        self.only_authority(env)?;
        if let Some((mint, _)) = target {
            self.reward_index(&mint).ok_or(ErrorCode::RewardNotFound)?;
        }

        self.compound_mint = target.map(|(mint, _)| mint);
        self.compound_pool = target.map(|(_, pool)| pool);
        host.emit(LockerEvent::CompoundTargetSet(CompoundTargetSet {
            mint: self.compound_mint,
            pool: self.compound_pool,
        }));
        Ok(())
    }

    /// Returns tokens sent to the vault by mistake. Never touches the staking
    /// token or a registered reward.
    pub fn recover_token<H: Host>(&mut self, env: &Env, mint: Pubkey, amount: u64, host: &mut H) -> Result<()> {
        self.only_authority(env)?;
        require!(mint != self.staking_mint, ErrorCode::CannotRecoverStakingToken);
        require!(self.reward_index(&mint).is_none(), ErrorCode::CannotRecoverRewardToken);
        require!(amount > 0, ErrorCode::ZeroAmount);

        let authority = self.authority;
        host.transfer_out(&mint, &authority, amount)?;
        host.emit(LockerEvent::Recovered(Recovered { token: mint, amount }));
        Ok(())
    }

    /// One-way: locking stops and every lock becomes withdrawable.
    pub fn shutdown<H: Host>(&mut self, env: &Env, host: &mut H) -> Result<()> {
        self.only_authority(env)?;
        require!(!self.is_shutdown, ErrorCode::AlreadyShutdown);

        self.catch_up_to(env.now);
        self.is_shutdown = true;
        host.emit(LockerEvent::Shutdown(Shutdown { timestamp: env.now }));
        Ok(())
    }

    pub fn transfer_ownership<H: Host>(&mut self, env: &Env, authority: Pubkey, host: &mut H) -> Result<()> {
        self.only_authority(env)?;
        require!(authority != Pubkey::default(), ErrorCode::InvalidAuthority);

        let previous = std::mem::replace(&mut self.authority, authority);
        host.emit(LockerEvent::OwnershipTransferred(OwnershipTransferred { previous, authority }));
        Ok(())
    }
}
