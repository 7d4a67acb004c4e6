use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_rooms_table::Migration),
            Box::new(m20240101_000002_create_guests_table::Migration),
            Box::new(m20240101_000003_create_packages_table::Migration),
            Box::new(m20240101_000004_create_promotions_table::Migration),
            Box::new(m20240101_000005_create_coupons_table::Migration),
            Box::new(m20240101_000006_create_bookings_table::Migration),
            Box::new(m20240101_000007_create_payments_table::Migration),
            Box::new(m20240101_000008_create_booking_notes_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_rooms_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_rooms_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Rooms::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Rooms::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Rooms::RoomNumber).string().not_null())
                        .col(ColumnDef::new(Rooms::RoomType).string().not_null())
                        .col(ColumnDef::new(Rooms::PricePerNight).decimal().not_null())
                        .col(ColumnDef::new(Rooms::MaxAdults).integer().not_null())
                        .col(ColumnDef::new(Rooms::MaxChildren).integer().not_null())
                        .col(
                            ColumnDef::new(Rooms::AllowChildren)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Rooms::Status).string().not_null())
                        .col(ColumnDef::new(Rooms::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Rooms::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rooms_room_number")
                        .table(Rooms::Table)
                        .col(Rooms::RoomNumber)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Rooms::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Rooms {
        Table,
        Id,
        RoomNumber,
        RoomType,
        PricePerNight,
        MaxAdults,
        MaxChildren,
        AllowChildren,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_guests_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_guests_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Guests::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Guests::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Guests::Email).string().not_null())
                        .col(ColumnDef::new(Guests::Phone).string().not_null())
                        .col(ColumnDef::new(Guests::FirstName).string().not_null())
                        .col(ColumnDef::new(Guests::LastName).string().not_null())
                        .col(ColumnDef::new(Guests::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Guests::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // The guest upsert resolves by email, so it must be unique.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_guests_email")
                        .table(Guests::Table)
                        .col(Guests::Email)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Guests::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Guests {
        Table,
        Id,
        Email,
        Phone,
        FirstName,
        LastName,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_packages_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_packages_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Packages::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Packages::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Packages::Name).string().not_null())
                        .col(ColumnDef::new(Packages::PackageType).string().not_null())
                        .col(ColumnDef::new(Packages::Value).decimal().not_null())
                        .col(ColumnDef::new(Packages::ValidFrom).date().not_null())
                        .col(ColumnDef::new(Packages::ValidTo).date().not_null())
                        .col(
                            ColumnDef::new(Packages::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Packages::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Packages::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Packages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Packages {
        Table,
        Id,
        Name,
        PackageType,
        Value,
        ValidFrom,
        ValidTo,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_promotions_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_promotions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Promotions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Promotions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Promotions::Name).string().not_null())
                        .col(ColumnDef::new(Promotions::DiscountType).string().not_null())
                        .col(
                            ColumnDef::new(Promotions::DiscountValue)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Promotions::ValidFrom).date().not_null())
                        .col(ColumnDef::new(Promotions::ValidTo).date().not_null())
                        .col(
                            ColumnDef::new(Promotions::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Promotions::ApplicableRooms).json().null())
                        .col(ColumnDef::new(Promotions::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Promotions::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Promotions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Promotions {
        Table,
        Id,
        Name,
        DiscountType,
        DiscountValue,
        ValidFrom,
        ValidTo,
        Active,
        ApplicableRooms,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_coupons_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_coupons_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Coupons::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Coupons::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Coupons::Code).string().not_null())
                        .col(ColumnDef::new(Coupons::DiscountType).string().not_null())
                        .col(ColumnDef::new(Coupons::DiscountValue).decimal().not_null())
                        .col(ColumnDef::new(Coupons::UsageLimit).integer().null())
                        .col(
                            ColumnDef::new(Coupons::UsedCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Coupons::ValidFrom).date().not_null())
                        .col(ColumnDef::new(Coupons::ValidTo).date().not_null())
                        .col(
                            ColumnDef::new(Coupons::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Coupons::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Coupons::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_coupons_code")
                        .table(Coupons::Table)
                        .col(Coupons::Code)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Coupons::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Coupons {
        Table,
        Id,
        Code,
        DiscountType,
        DiscountValue,
        UsageLimit,
        UsedCount,
        ValidFrom,
        ValidTo,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000006_create_bookings_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_bookings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Bookings::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Bookings::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Bookings::Reference).string().not_null())
                        .col(ColumnDef::new(Bookings::GuestId).uuid().not_null())
                        .col(ColumnDef::new(Bookings::RoomId).uuid().not_null())
                        .col(ColumnDef::new(Bookings::CheckIn).date().not_null())
                        .col(ColumnDef::new(Bookings::CheckOut).date().not_null())
                        .col(ColumnDef::new(Bookings::Adults).integer().not_null())
                        .col(
                            ColumnDef::new(Bookings::Children)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Bookings::TotalAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(Bookings::DiscountAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Bookings::PackageId).uuid().null())
                        .col(ColumnDef::new(Bookings::PromotionId).uuid().null())
                        .col(ColumnDef::new(Bookings::CouponCode).string().null())
                        .col(ColumnDef::new(Bookings::Status).string().not_null())
                        .col(ColumnDef::new(Bookings::CancellationReason).string().null())
                        .col(ColumnDef::new(Bookings::DeletedAt).timestamp().null())
                        .col(ColumnDef::new(Bookings::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Bookings::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // The availability query always narrows by room and stay window.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_room_dates")
                        .table(Bookings::Table)
                        .col(Bookings::RoomId)
                        .col(Bookings::CheckIn)
                        .col(Bookings::CheckOut)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_status")
                        .table(Bookings::Table)
                        .col(Bookings::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_reference")
                        .table(Bookings::Table)
                        .col(Bookings::Reference)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bookings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Bookings {
        Table,
        Id,
        Reference,
        GuestId,
        RoomId,
        CheckIn,
        CheckOut,
        Adults,
        Children,
        TotalAmount,
        DiscountAmount,
        PackageId,
        PromotionId,
        CouponCode,
        Status,
        CancellationReason,
        DeletedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000007_create_payments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_payments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Payments::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Payments::BookingId).uuid().not_null())
                        .col(ColumnDef::new(Payments::Method).string().not_null())
                        .col(ColumnDef::new(Payments::Amount).decimal().not_null())
                        .col(ColumnDef::new(Payments::Status).string().not_null())
                        .col(ColumnDef::new(Payments::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Payments::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payments_booking_id")
                        .table(Payments::Table)
                        .col(Payments::BookingId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Payments {
        Table,
        Id,
        BookingId,
        Method,
        Amount,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000008_create_booking_notes_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_booking_notes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BookingNotes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BookingNotes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BookingNotes::BookingId).uuid().not_null())
                        .col(ColumnDef::new(BookingNotes::Note).text().not_null())
                        .col(
                            ColumnDef::new(BookingNotes::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_booking_notes_booking_id")
                        .table(BookingNotes::Table)
                        .col(BookingNotes::BookingId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BookingNotes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum BookingNotes {
        Table,
        Id,
        BookingId,
        Note,
        CreatedAt,
    }
}
