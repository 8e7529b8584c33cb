/// Text printed by `htp doc`.
pub const USAGE_GUIDE: &str = r#"htp - a small HTTP client that remembers your API

SETUP
  htp set-base-url http://localhost:8888
      Store the base URL that request paths are appended to. The URL is kept
      as typed: "http://h/api" + "/users" becomes "http://h/api/users".

  htp login --username fluffy --password secret
      POST {"username": ..., "password": ...} to <base URL>/login and store the
      Authorization header from the response as the auth token.
      --login-path /auth   use another path than /login
      --url URL            log in against a full URL instead
      --base-url URL       use this base URL just for this call

REQUESTS
  htp req GET /users
  htp req POST /users --data name=bob age=42 score=9.5
  htp req GET /users --fields id,name
  htp http://localhost:8888/getjson

  The stored token is sent verbatim as the Authorization header.
  --data values become numbers when they parse as one (values with a dot as
  floats, otherwise integers) and stay strings otherwise. A body is only sent
  for POST.
  --fields keeps only the listed keys of a JSON object, or of every object in
  a JSON array. Missing keys show up as null. Non-JSON responses are printed
  as they are.

OUTPUT
  Set HTP_COL=1 to color JSON output when writing to a terminal.
  Use -v / -vv for diagnostics on stderr, or HTP_LOG=<filter>.

FILES
  Credentials live in .htp/base_url.env and .htp/auth_token.env in the
  current directory (override with --config-dir or HTP_CONFIG_DIR).

EXIT STATUS
  0 on success, 1 on a missing URL, network failure, HTTP error status or
  failed login.

LIMITATIONS
  There is no request timeout: an unresponsive server blocks htp until it is
  interrupted."#;
