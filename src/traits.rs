use sea_orm::DbErr;

/// Apply a partial update payload onto an existing active model.
///
/// Only fields present in the payload are touched; everything else keeps the
/// stored value.
pub trait MergeIntoActiveModel<ActiveModelType> {
    /// # Errors
    ///
    /// Returns a `DbErr` if a value cannot be converted for storage.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}
