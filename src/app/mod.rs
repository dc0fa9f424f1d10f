//! Application use cases and transactions.

mod club;
mod fan;
mod subscription;

pub use club::{
    club_create, club_delete, club_get, club_list, club_members, club_update, ClubCreateReq,
    ClubDto, ClubMemberDto, ClubUpdateReq,
};
pub use fan::{
    fan_create, fan_delete, fan_get, fan_list, fan_update, FanCreateReq, FanDto, FanListItemDto,
    FanUpdateReq,
};
pub use subscription::{
    apply_reconciliation, fan_subscription_options, fan_subscriptions, subscription_reconcile,
    SubscriptionDto, SubscriptionGateway, SubscriptionOptionDto, SubscriptionReconcileReq,
};
