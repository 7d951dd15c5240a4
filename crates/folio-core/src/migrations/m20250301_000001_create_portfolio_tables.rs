use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ── contact_info ──
        manager
            .create_table(
                Table::create()
                    .table(ContactInfo::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContactInfo::Id).uuid().not_null().primary_key())
                    .col(text_col(ContactInfo::Email, 255))
                    .col(text_col(ContactInfo::Phone, 50))
                    .col(text_col(ContactInfo::Location, 255))
                    .col(text_col(ContactInfo::Linkedin, 255))
                    .col(text_col(ContactInfo::Github, 255))
                    .col(text_col(ContactInfo::Twitter, 255))
                    .col(text_col(ContactInfo::Website, 500))
                    .col(ColumnDef::new(ContactInfo::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── skills ──
        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Skills::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Skills::Name).string_len(100).not_null())
                    .col(text_col(Skills::Icon, 50))
                    .col(ColumnDef::new(Skills::Proficiency).integer().not_null().default(0))
                    .col(text_col(Skills::Category, 100))
                    .col(ColumnDef::new(Skills::SortOrder).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Skills::ShowInPortfolio)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Skills::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Skills::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── projects ──
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::Title).string_len(255).not_null())
                    .col(text_col(Projects::TitleFr, 255))
                    .col(ColumnDef::new(Projects::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Projects::DescriptionFr).text().not_null().default(""))
                    .col(text_col(Projects::ImageUrl, 500))
                    .col(text_col(Projects::LiveUrl, 500))
                    .col(text_col(Projects::CodeUrl, 500))
                    .col(ColumnDef::new(Projects::Tags).json().not_null())
                    .col(ColumnDef::new(Projects::Featured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Projects::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Projects::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── experiences ──
        manager
            .create_table(
                Table::create()
                    .table(Experiences::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Experiences::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Experiences::Title).string_len(255).not_null())
                    .col(text_col(Experiences::TitleFr, 255))
                    .col(ColumnDef::new(Experiences::Company).string_len(255).not_null())
                    .col(text_col(Experiences::CompanyFr, 255))
                    .col(text_col(Experiences::Location, 255))
                    .col(text_col(Experiences::LocationFr, 255))
                    .col(ColumnDef::new(Experiences::StartDate).date().not_null())
                    .col(ColumnDef::new(Experiences::EndDate).date().null())
                    .col(ColumnDef::new(Experiences::Current).boolean().not_null().default(false))
                    .col(ColumnDef::new(Experiences::Description).json().not_null())
                    .col(ColumnDef::new(Experiences::DescriptionFr).json().not_null())
                    .col(ColumnDef::new(Experiences::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(Experiences::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Experiences::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── education ──
        manager
            .create_table(
                Table::create()
                    .table(Education::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Education::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Education::Degree).string_len(255).not_null())
                    .col(text_col(Education::DegreeFr, 255))
                    .col(ColumnDef::new(Education::School).string_len(255).not_null())
                    .col(text_col(Education::SchoolFr, 255))
                    .col(text_col(Education::Location, 255))
                    .col(text_col(Education::LocationFr, 255))
                    .col(ColumnDef::new(Education::StartDate).date().not_null())
                    .col(ColumnDef::new(Education::EndDate).date().null())
                    .col(ColumnDef::new(Education::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Education::DescriptionFr).text().not_null().default(""))
                    .col(ColumnDef::new(Education::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(Education::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Education::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── hobbies ──
        manager
            .create_table(
                Table::create()
                    .table(Hobbies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Hobbies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Hobbies::Name).string_len(100).not_null())
                    .col(text_col(Hobbies::Icon, 50))
                    .col(ColumnDef::new(Hobbies::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Hobbies::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(Hobbies::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Hobbies::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── testimonials ──
        manager
            .create_table(
                Table::create()
                    .table(Testimonials::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Testimonials::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Testimonials::AuthorName).string_len(255).not_null())
                    .col(text_col(Testimonials::AuthorRole, 255))
                    .col(ColumnDef::new(Testimonials::AuthorEmail).string_len(255).not_null())
                    .col(ColumnDef::new(Testimonials::Content).text().not_null())
                    .col(ColumnDef::new(Testimonials::Rating).integer().not_null())
                    .col(
                        ColumnDef::new(Testimonials::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Testimonials::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Testimonials::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── messages ──
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Messages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Messages::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Messages::Email).string_len(255).not_null())
                    .col(text_col(Messages::Subject, 255))
                    .col(ColumnDef::new(Messages::Content).text().not_null())
                    .col(ColumnDef::new(Messages::IsRead).boolean().not_null().default(false))
                    .col(ColumnDef::new(Messages::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── Indexes ──
        for (name, table, column) in [
            ("idx_skills_sort_order", Skills::Table.into_iden(), Skills::SortOrder.into_iden()),
            ("idx_projects_sort_order", Projects::Table.into_iden(), Projects::SortOrder.into_iden()),
            ("idx_projects_featured", Projects::Table.into_iden(), Projects::Featured.into_iden()),
            (
                "idx_experiences_sort_order",
                Experiences::Table.into_iden(),
                Experiences::SortOrder.into_iden(),
            ),
            (
                "idx_education_sort_order",
                Education::Table.into_iden(),
                Education::SortOrder.into_iden(),
            ),
            ("idx_hobbies_sort_order", Hobbies::Table.into_iden(), Hobbies::SortOrder.into_iden()),
            (
                "idx_testimonials_status",
                Testimonials::Table.into_iden(),
                Testimonials::Status.into_iden(),
            ),
            ("idx_messages_is_read", Messages::Table.into_iden(), Messages::IsRead.into_iden()),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(table)
                        .col(column)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Testimonials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hobbies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Education::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Experiences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContactInfo::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// Optional short text stored as `''` rather than NULL.
fn text_col<T: IntoIden>(name: T, len: u32) -> ColumnDef {
    ColumnDef::new(name)
        .string_len(len)
        .not_null()
        .default("")
        .to_owned()
}

#[derive(DeriveIden)]
enum ContactInfo {
    Table,
    Id,
    Email,
    Phone,
    Location,
    Linkedin,
    Github,
    Twitter,
    Website,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
    Name,
    Icon,
    Proficiency,
    Category,
    SortOrder,
    ShowInPortfolio,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Title,
    TitleFr,
    Description,
    DescriptionFr,
    ImageUrl,
    LiveUrl,
    CodeUrl,
    Tags,
    Featured,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Experiences {
    Table,
    Id,
    Title,
    TitleFr,
    Company,
    CompanyFr,
    Location,
    LocationFr,
    StartDate,
    EndDate,
    Current,
    Description,
    DescriptionFr,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Education {
    Table,
    Id,
    Degree,
    DegreeFr,
    School,
    SchoolFr,
    Location,
    LocationFr,
    StartDate,
    EndDate,
    Description,
    DescriptionFr,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Hobbies {
    Table,
    Id,
    Name,
    Icon,
    Description,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Testimonials {
    Table,
    Id,
    AuthorName,
    AuthorRole,
    AuthorEmail,
    Content,
    Rating,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    Name,
    Email,
    Subject,
    Content,
    IsRead,
    CreatedAt,
}
