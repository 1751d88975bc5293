//! Embedded schema migrations, applied at start-up and by the test harness.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateCatalogTables)]
    }
}

pub struct CreateCatalogTables;

impl MigrationName for CreateCatalogTables {
    fn name(&self) -> &'static str {
        "m20250101_000001_create_catalog_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCatalogTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Categories::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Categories::Description).text().null())
                    .col(ColumnDef::new(Categories::Icon).string().null())
                    .col(ColumnDef::new(Categories::Position).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vehicles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vehicles::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Vehicles::Brand).string().not_null())
                    .col(ColumnDef::new(Vehicles::Model).string().not_null())
                    .col(ColumnDef::new(Vehicles::Year).integer().not_null())
                    .col(ColumnDef::new(Vehicles::Price).double().not_null())
                    .col(
                        ColumnDef::new(Vehicles::PriceNegotiable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Vehicles::Status)
                            .string_len(32)
                            .not_null()
                            .default("AVAILABLE"),
                    )
                    .col(ColumnDef::new(Vehicles::IsVisible).boolean().not_null().default(true))
                    .col(ColumnDef::new(Vehicles::IsFeatured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Vehicles::Mileage).integer().null())
                    .col(ColumnDef::new(Vehicles::FuelType).string_len(32).null())
                    .col(ColumnDef::new(Vehicles::Transmission).string_len(32).null())
                    .col(ColumnDef::new(Vehicles::BodyType).string_len(32).null())
                    .col(ColumnDef::new(Vehicles::ExteriorColor).string().null())
                    .col(ColumnDef::new(Vehicles::InteriorColor).string().null())
                    .col(ColumnDef::new(Vehicles::Doors).integer().null())
                    .col(ColumnDef::new(Vehicles::Seats).integer().null())
                    .col(ColumnDef::new(Vehicles::EngineSize).string().null())
                    .col(ColumnDef::new(Vehicles::EnginePower).string().null())
                    .col(ColumnDef::new(Vehicles::Vin).string().null())
                    .col(ColumnDef::new(Vehicles::LicensePlate).string().null())
                    .col(ColumnDef::new(Vehicles::PreviousOwners).integer().null())
                    .col(ColumnDef::new(Vehicles::Description).text().not_null())
                    .col(ColumnDef::new(Vehicles::Features).json().not_null())
                    .col(ColumnDef::new(Vehicles::CategoryId).uuid().null())
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vehicles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_category")
                            .from(Vehicles::Table, Vehicles::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Backs the canonical catalog ordering.
        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_catalog_order")
                    .table(Vehicles::Table)
                    .col(Vehicles::IsFeatured)
                    .col(Vehicles::CreatedAt)
                    .col(Vehicles::Id)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VehicleImages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VehicleImages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(VehicleImages::VehicleId).uuid().not_null())
                    .col(ColumnDef::new(VehicleImages::Url).string().not_null())
                    .col(ColumnDef::new(VehicleImages::AltText).string().null())
                    .col(ColumnDef::new(VehicleImages::Position).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(VehicleImages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_images_vehicle")
                            .from(VehicleImages::Table, VehicleImages::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inquiries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Inquiries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Inquiries::Name).string().not_null())
                    .col(ColumnDef::new(Inquiries::Email).string().not_null())
                    .col(ColumnDef::new(Inquiries::Phone).string().null())
                    .col(ColumnDef::new(Inquiries::Message).text().not_null())
                    .col(ColumnDef::new(Inquiries::VehicleId).uuid().null())
                    .col(
                        ColumnDef::new(Inquiries::Status)
                            .string_len(32)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Inquiries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiries_vehicle")
                            .from(Inquiries::Table, Inquiries::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Inquiries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VehicleImages::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Icon,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    Slug,
    Brand,
    Model,
    Year,
    Price,
    PriceNegotiable,
    Status,
    IsVisible,
    IsFeatured,
    Mileage,
    FuelType,
    Transmission,
    BodyType,
    ExteriorColor,
    InteriorColor,
    Doors,
    Seats,
    EngineSize,
    EnginePower,
    Vin,
    LicensePlate,
    PreviousOwners,
    Description,
    Features,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VehicleImages {
    Table,
    Id,
    VehicleId,
    Url,
    AltText,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Inquiries {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Message,
    VehicleId,
    Status,
    CreatedAt,
}
