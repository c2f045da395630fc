use chrono::NaiveDate;
use serde::Deserialize;

use crate::app::boxoffice::{Actor, BoxofficeRecode, BoxofficeSnapshot, MovieInfo, RankType};
use crate::app::error::FetchError;

const KOBIS_BASE_URL: &str = "http://www.kobis.or.kr/kobisopenapi/webservice/rest";

/// Commercial releases versus diversity (independent/art) films.
// Part of the query API; the list screen always queries without filters.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieType {
    Commercial,
    Diversity,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NationType {
    Korean,
    Foreign,
}

/// Parameters of a daily box office request. Only `date` is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxofficeQuery {
    pub date: NaiveDate,
    pub item_per_page: Option<u32>,
    pub movie_type: Option<MovieType>,
    pub nation_type: Option<NationType>,
    pub area_code: Option<String>,
}

impl BoxofficeQuery {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            item_per_page: None,
            movie_type: None,
            nation_type: None,
            area_code: None,
        }
    }

    fn query_string(&self) -> String {
        let mut params = vec![format!("targetDt={}", self.date.format("%Y%m%d"))];
        if let Some(items) = self.item_per_page {
            params.push(format!("itemPerPage={}", items));
        }
        if let Some(movie_type) = self.movie_type {
            let flag = match movie_type {
                MovieType::Commercial => "N",
                MovieType::Diversity => "Y",
            };
            params.push(format!("multiMovieYn={}", flag));
        }
        if let Some(nation_type) = self.nation_type {
            let code = match nation_type {
                NationType::Korean => "K",
                NationType::Foreign => "F",
            };
            params.push(format!("repNationCd={}", code));
        }
        if let Some(area) = &self.area_code {
            params.push(format!("wideAreaCd={}", urlencoding::encode(area)));
        }
        params.join("&")
    }
}

/// Source of box office rankings and movie details.
pub trait MovieService: Send + Sync {
    fn fetch_boxoffice(&self, query: &BoxofficeQuery) -> Result<BoxofficeSnapshot, FetchError>;

    fn fetch_movie_info(&self, movie_code: &str) -> Result<MovieInfo, FetchError>;
}

/// Client for the Korean Film Council open API.
pub struct KobisMovieService {
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl KobisMovieService {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: reqwest::blocking::Client::new(),
        }
    }

    fn get(&self, path: &str, query: &str) -> Result<String, FetchError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey("KOBIS_API_KEY"))?;
        let url = format!(
            "{}/{}?key={}&{}",
            KOBIS_BASE_URL,
            path,
            urlencoding::encode(key),
            query
        );
        tracing::debug!(path, "requesting kobis");

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.text()?)
    }
}

impl MovieService for KobisMovieService {
    fn fetch_boxoffice(&self, query: &BoxofficeQuery) -> Result<BoxofficeSnapshot, FetchError> {
        let body = self.get(
            "boxoffice/searchDailyBoxOfficeList.json",
            &query.query_string(),
        )?;
        parse_boxoffice(&body)
    }

    fn fetch_movie_info(&self, movie_code: &str) -> Result<MovieInfo, FetchError> {
        let query = format!("movieCd={}", urlencoding::encode(movie_code));
        let body = self.get("movie/searchMovieInfo.json", &query)?;
        parse_movie_info(&body)
    }
}

#[derive(Debug, Deserialize)]
struct FaultInfo {
    message: String,
    #[serde(rename = "errorCode", default)]
    error_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoxofficeEnvelope {
    box_office_result: Option<BoxofficeResult>,
    fault_info: Option<FaultInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoxofficeResult {
    show_range: String,
    #[serde(default)]
    daily_box_office_list: Vec<DailyBoxofficeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyBoxofficeEntry {
    rank: String,
    rank_inten: String,
    rank_old_and_new: String,
    movie_cd: String,
    movie_nm: String,
    audi_cnt: String,
    audi_acc: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieInfoEnvelope {
    movie_info_result: Option<MovieInfoResult>,
    fault_info: Option<FaultInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieInfoResult {
    movie_info: MovieInfoPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieInfoPayload {
    movie_cd: String,
    movie_nm: String,
    #[serde(default)]
    movie_nm_en: String,
    #[serde(default)]
    prdt_year: String,
    #[serde(default)]
    show_tm: String,
    #[serde(default)]
    open_dt: String,
    #[serde(default)]
    prdt_stat_nm: String,
    #[serde(default)]
    type_nm: String,
    #[serde(default)]
    nations: Vec<NationPayload>,
    #[serde(default)]
    genres: Vec<GenrePayload>,
    #[serde(default)]
    directors: Vec<PersonPayload>,
    #[serde(default)]
    actors: Vec<PersonPayload>,
    #[serde(default)]
    audits: Vec<AuditPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NationPayload {
    nation_nm: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenrePayload {
    genre_nm: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonPayload {
    people_nm: String,
    #[serde(default)]
    cast: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditPayload {
    watch_grade_nm: String,
}

fn fault(info: FaultInfo) -> FetchError {
    if info.error_code.is_empty() {
        FetchError::Service(info.message)
    } else {
        FetchError::Service(format!("{} ({})", info.message, info.error_code))
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, FetchError> {
    value
        .trim()
        .parse()
        .map_err(|_| FetchError::Malformed(format!("{} is not a number: {:?}", field, value)))
}

fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y%m%d").ok()
}

/// Decodes a `searchDailyBoxOfficeList` response body.
pub fn parse_boxoffice(body: &str) -> Result<BoxofficeSnapshot, FetchError> {
    let envelope: BoxofficeEnvelope =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if let Some(info) = envelope.fault_info {
        return Err(fault(info));
    }
    let result = envelope
        .box_office_result
        .ok_or_else(|| FetchError::Malformed("missing boxOfficeResult".to_string()))?;

    // showRange is "20230201~20230201" for a daily query
    let start = result.show_range.split('~').next().unwrap_or_default();
    let date = parse_compact_date(start).ok_or_else(|| {
        FetchError::Malformed(format!("unreadable showRange: {:?}", result.show_range))
    })?;

    let recodes = result
        .daily_box_office_list
        .into_iter()
        .map(|entry| -> Result<BoxofficeRecode, FetchError> {
            let rank_type = match entry.rank_old_and_new.as_str() {
                "NEW" => RankType::New,
                "OLD" => RankType::Old(parse_number("rankInten", &entry.rank_inten)?),
                other => {
                    return Err(FetchError::Malformed(format!(
                        "unknown rankOldAndNew: {:?}",
                        other
                    )));
                }
            };
            Ok(BoxofficeRecode {
                rank: parse_number("rank", &entry.rank)?,
                rank_type,
                movie_code: entry.movie_cd,
                movie_name: entry.movie_nm,
                audience_count: parse_number("audiCnt", &entry.audi_cnt)?,
                audience_accumulation: parse_number("audiAcc", &entry.audi_acc)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    BoxofficeSnapshot::new(date, recodes)
}

/// Decodes a `searchMovieInfo` response body.
pub fn parse_movie_info(body: &str) -> Result<MovieInfo, FetchError> {
    let envelope: MovieInfoEnvelope =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if let Some(info) = envelope.fault_info {
        return Err(fault(info));
    }
    let info = envelope
        .movie_info_result
        .ok_or_else(|| FetchError::Malformed("missing movieInfoResult".to_string()))?
        .movie_info;

    Ok(MovieInfo {
        movie_code: info.movie_cd,
        movie_name: info.movie_nm,
        movie_name_en: info.movie_nm_en,
        production_year: info.prdt_year,
        show_time_minutes: info.show_tm.trim().parse().ok(),
        open_date: parse_compact_date(&info.open_dt),
        production_status: info.prdt_stat_nm,
        type_name: info.type_nm,
        genres: info.genres.into_iter().map(|g| g.genre_nm).collect(),
        nations: info.nations.into_iter().map(|n| n.nation_nm).collect(),
        directors: info.directors.into_iter().map(|d| d.people_nm).collect(),
        actors: info
            .actors
            .into_iter()
            .map(|a| Actor {
                name: a.people_nm,
                cast: a.cast,
            })
            .collect(),
        watch_grade: info.audits.into_iter().next().map(|a| a.watch_grade_nm),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY: &str = r#"{
        "boxOfficeResult": {
            "boxofficeType": "일별 박스오피스",
            "showRange": "20230201~20230201",
            "dailyBoxOfficeList": [
                {"rnum": "2", "rank": "2", "rankInten": "-1", "rankOldAndNew": "OLD",
                 "movieCd": "B", "movieNm": "Beta", "openDt": "2022-12-14",
                 "audiCnt": "800", "audiAcc": "20000"},
                {"rnum": "1", "rank": "1", "rankInten": "5", "rankOldAndNew": "NEW",
                 "movieCd": "A", "movieNm": "Alpha", "openDt": "2023-02-01",
                 "audiCnt": "1000", "audiAcc": "5000"}
            ]
        }
    }"#;

    #[test]
    fn parses_daily_boxoffice() {
        let snapshot = parse_boxoffice(DAILY).unwrap();

        assert_eq!(snapshot.date(), NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        let first = &snapshot.recodes()[0];
        assert_eq!(first.movie_code, "A");
        // a first-day entry stays New whatever rankInten says
        assert_eq!(first.rank_type, RankType::New);
        assert_eq!(first.audience_count, 1000);
        assert_eq!(first.audience_accumulation, 5000);
        assert_eq!(snapshot.recodes()[1].rank_type, RankType::Old(-1));
    }

    #[test]
    fn fault_info_becomes_service_error() {
        let body = r#"{"faultInfo": {"message": "유효하지않은 키값입니다.", "errorCode": "320010"}}"#;
        match parse_boxoffice(body) {
            Err(FetchError::Service(message)) => assert!(message.contains("320010")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn non_numeric_audience_is_malformed() {
        let body = DAILY.replace("\"800\"", "\"many\"");
        assert!(matches!(parse_boxoffice(&body), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn query_string_carries_only_the_date_by_default() {
        let query = BoxofficeQuery::for_date(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert_eq!(query.query_string(), "targetDt=20230201");
    }

    #[test]
    fn query_string_includes_filters() {
        let query = BoxofficeQuery {
            item_per_page: Some(5),
            movie_type: Some(MovieType::Diversity),
            nation_type: Some(NationType::Foreign),
            area_code: Some("0105000000".to_string()),
            ..BoxofficeQuery::for_date(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap())
        };
        assert_eq!(
            query.query_string(),
            "targetDt=20230201&itemPerPage=5&multiMovieYn=Y&repNationCd=F&wideAreaCd=0105000000"
        );
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let service = KobisMovieService::new(None);
        let query = BoxofficeQuery::for_date(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert!(matches!(
            service.fetch_boxoffice(&query),
            Err(FetchError::MissingApiKey("KOBIS_API_KEY"))
        ));
    }

    #[test]
    fn parses_movie_info() {
        let body = r#"{"movieInfoResult": {"movieInfo": {
            "movieCd": "20124079", "movieNm": "광해, 왕이 된 남자", "movieNmEn": "Masquerade",
            "prdtYear": "2012", "showTm": "131", "openDt": "20120913",
            "prdtStatNm": "개봉", "typeNm": "장편",
            "nations": [{"nationNm": "한국"}],
            "genres": [{"genreNm": "사극"}, {"genreNm": "드라마"}],
            "directors": [{"peopleNm": "추창민", "peopleNmEn": "CHOO Chang-min"}],
            "actors": [{"peopleNm": "이병헌", "peopleNmEn": "LEE Byung-hun", "cast": "광해/하선"}],
            "audits": [{"auditNo": "2012-MF00709", "watchGradeNm": "15세이상관람가"}]
        }, "source": "영화진흥위원회"}}"#;

        let info = parse_movie_info(body).unwrap();
        assert_eq!(info.movie_name_en, "Masquerade");
        assert_eq!(info.show_time_minutes, Some(131));
        assert_eq!(info.open_date, NaiveDate::from_ymd_opt(2012, 9, 13));
        assert_eq!(info.genres, vec!["사극", "드라마"]);
        assert_eq!(info.actors[0].cast, "광해/하선");
        assert_eq!(info.watch_grade.as_deref(), Some("15세이상관람가"));
    }
}
