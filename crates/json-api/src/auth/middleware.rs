//! User identity middleware.

use salvo::prelude::*;

use sweetcart_app::domain::users::UserUuid;

use crate::{errors::ApiError, extensions::*};

pub(crate) const USER_UUID_HEADER: &str = "x-user-uuid";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(user) = extract_user_uuid(req) else {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Missing or invalid x-user-uuid header",
        )
        .render(res);

        ctrl.skip_rest();

        return;
    };

    depot.insert_user_uuid(user);

    ctrl.call_next(req, depot, res).await;
}

fn extract_user_uuid(req: &Request) -> Option<UserUuid> {
    req.headers()
        .get(USER_UUID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    #[salvo::handler]
    async fn echo_user(depot: &mut Depot, res: &mut Response) {
        let user = depot
            .user_uuid_or_401()
            .ok()
            .map_or_else(|| "missing".to_string(), |uuid: UserUuid| uuid.to_string());

        res.render(user);
    }

    fn make_service() -> Service {
        let router = Router::new()
            .hoop(handler)
            .push(Router::new().get(echo_user));

        Service::new(router)
    }

    #[tokio::test]
    async fn test_missing_user_header_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_user_header_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .add_header(USER_UUID_HEADER, "not-a-uuid", true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_user_header_injects_user_uuid() -> TestResult {
        let user = UserUuid::from_uuid(Uuid::now_v7());

        let mut res = TestClient::get("http://example.com")
            .add_header(USER_UUID_HEADER, user.to_string(), true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, user.to_string());

        Ok(())
    }
}
