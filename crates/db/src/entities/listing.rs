//! Listing entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Listing lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Saved but not yet visible to students
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Live and searchable
    #[sea_orm(string_value = "active")]
    Active,
    /// Temporarily hidden by the lister
    #[sea_orm(string_value = "paused")]
    Paused,
    /// Soft-deleted; listings are never removed
    #[sea_orm(string_value = "archived")]
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning lister
    pub lister_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub city: String,

    /// Always >= 1; listings with a single occupant skip the tenant-request flow
    pub max_occupants: i32,

    pub status: ListingStatus,

    #[sea_orm(nullable)]
    pub contact_phone: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether students can ask to be listed as tenants here.
    #[must_use]
    pub const fn accepts_tenant_requests(&self) -> bool {
        self.max_occupants > 1
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ListerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Lister,

    #[sea_orm(has_many = "super::tenant_request::Entity")]
    TenantRequests,

    #[sea_orm(has_many = "super::listing_tenant::Entity")]
    Tenants,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lister.def()
    }
}

impl Related<super::tenant_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantRequests.def()
    }
}

impl Related<super::listing_tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
