use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MovieDoc {
    pub id: i64,
    /// At most 100 characters.
    pub title: String,
    /// 1900..=2100
    pub year: i32,
    /// At most 100 characters.
    pub director: String,
    /// `HH:MM:SS`
    pub length: String,
    /// 0..=10
    pub rating: u8,
}

#[derive(ToSchema)]
pub struct MoviePatchDoc {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub length: Option<String>,
    pub rating: Option<u8>,
}

#[derive(ToSchema)]
pub struct MovieEnvelopeDoc { pub movie: MovieDoc }

#[derive(ToSchema)]
pub struct MoviePatchEnvelopeDoc { pub movie: MoviePatchDoc }

#[derive(ToSchema)]
pub struct MovieListDoc { pub list: Vec<MovieDoc> }

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub status: u16, pub reason: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::movies::list_movies,
        crate::routes::movies::get_movie,
        crate::routes::movies::create_movie,
        crate::routes::movies::patch_movie,
        crate::routes::movies::delete_movie,
    ),
    components(
        schemas(
            HealthResponse,
            MovieDoc,
            MoviePatchDoc,
            MovieEnvelopeDoc,
            MoviePatchEnvelopeDoc,
            MovieListDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "movies")
    )
)]
pub struct ApiDoc;
